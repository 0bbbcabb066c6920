use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Per-episode scores: the full history plus a bounded trailing window used
/// for the solved check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    scores: Vec<f32>,
    window: VecDeque<f32>,
    window_size: usize,
}

impl ScoreTracker {
    pub fn new(window_size: usize) -> Self {
        ScoreTracker {
            scores: Vec::new(),
            window: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Record an episode score.
    pub fn record(&mut self, score: f32) {
        self.scores.push(score);
        if self.window_size == 0 {
            return;
        }
        if self.window.len() >= self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(score);
    }

    /// Mean of the trailing window, or 0 before the first episode.
    ///
    /// The mean is over however many scores the window holds, so it is
    /// meaningful (if noisy) before the window fills up.
    pub fn trailing_mean(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f32>() / self.window.len() as f32
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn window(&self) -> impl Iterator<Item = &f32> {
        self.window.iter()
    }

    pub fn episodes(&self) -> usize {
        self.scores.len()
    }

    pub fn last(&self) -> Option<f32> {
        self.scores.last().copied()
    }

    pub fn best(&self) -> Option<f32> {
        self.scores.iter().copied().fold(None, |best, s| match best {
            Some(b) if b >= s => Some(b),
            _ => Some(s),
        })
    }

    pub fn into_scores(self) -> Vec<f32> {
        self.scores
    }
}
