use std::path::PathBuf;

use crate::config::{Config, DqnConfig, TrainerConfig};
use crate::optimizer::OptimizerKind;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.agent.buffer_size, 100_000);
    assert_eq!(config.agent.batch_size, 64);
    assert_eq!(config.agent.gamma, 0.99);
    assert_eq!(config.agent.tau, 1e-3);
    assert_eq!(config.agent.learning_rate, 5e-4);
    assert_eq!(config.agent.update_every, 4);
    assert_eq!(config.network.hidden_sizes, vec![256, 256]);
    assert_eq!(config.trainer.n_episodes, 1200);
    assert_eq!(config.trainer.max_t, 300);
    assert_eq!(config.trainer.eps_end, 0.005);
    assert_eq!(config.trainer.eps_decay, 0.995);
    assert_eq!(config.trainer.solved_threshold, 15.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_uses_defaults() {
    let json = r#"{
        "agent": { "batch_size": 32, "optimizer": { "kind": "sgd" } },
        "trainer": { "max_t": 50, "checkpoint_dir": "runs" }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.agent.batch_size, 32);
    assert_eq!(config.agent.optimizer, OptimizerKind::Sgd);
    assert_eq!(config.agent.gamma, 0.99);
    assert_eq!(config.trainer.max_t, 50);
    assert_eq!(config.trainer.checkpoint_dir, PathBuf::from("runs"));
    assert_eq!(config.trainer.n_episodes, 1200);
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut config = Config::default();
    config.agent.seed = Some(7);
    config.network.hidden_sizes = vec![64];

    config.to_json_file(&path).unwrap();
    assert_eq!(Config::from_json_file(&path).unwrap(), config);
}

#[test]
fn test_from_json_file_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "agent": { "gamma": 1.5 } }"#).unwrap();

    assert!(Config::from_json_file(&path).is_err());
}

#[test]
fn test_validation() {
    assert!(DqnConfig { batch_size: 0, ..DqnConfig::default() }.validate().is_err());
    assert!(DqnConfig { update_every: 0, ..DqnConfig::default() }.validate().is_err());
    assert!(DqnConfig { learning_rate: -1.0, ..DqnConfig::default() }.validate().is_err());
    assert!(DqnConfig { batch_size: 10, buffer_size: 5, warmup: 0, ..DqnConfig::default() }.validate().is_err());

    assert!(TrainerConfig { eps_start: 0.1, eps_end: 0.5, ..TrainerConfig::default() }.validate().is_err());
    assert!(TrainerConfig { score_window: 0, ..TrainerConfig::default() }.validate().is_err());
    assert!(TrainerConfig { max_t: 0, ..TrainerConfig::default() }.validate().is_err());
}

#[test]
fn test_learning_threshold() {
    let config = DqnConfig { batch_size: 64, warmup: 1000, ..DqnConfig::default() };
    assert_eq!(config.learning_threshold(), 1000);
    let config = DqnConfig { batch_size: 64, warmup: 0, ..DqnConfig::default() };
    assert_eq!(config.learning_threshold(), 64);
}
