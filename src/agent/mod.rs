//! # Agents
//!
//! [`DqnAgent`] is the learning core: it owns the local and target
//! approximators plus the replay memory, picks actions epsilon-greedily and
//! decides when to learn. The [`Agent`] trait is the narrow surface the
//! training loop drives, so the loop can be exercised with scripted agents.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use navigator::builders::DqnAgentBuilder;
//! use ndarray::Array1;
//!
//! // 37 raw observation dims + reward + 4 one-hot actions, two frames of history
//! let mut agent = DqnAgentBuilder::new()
//!     .state_size(2 * 42)
//!     .action_size(4)
//!     .build()
//!     .unwrap();
//!
//! let state = Array1::zeros(84);
//! let action = agent.act(state.view(), 1.0).unwrap();
//! ```

pub mod traits;

mod dqn;
pub use dqn::{greedy_action, td_targets, DqnAgent};
pub use traits::Agent;
