pub mod test_config;
pub mod test_layers;
pub mod test_network;
pub mod test_optimizer;
