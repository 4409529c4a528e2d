//! Keyboard teleoperation.
//!
//! Two mappers share one key layout:
//!
//! - [`KeyCommandMapper`] composes held keys into a velocity command
//!   (`geometry_msgs/msg/Twist`) and emits a stop command when the last key
//!   is released.
//! - [`PoseCommandMapper`] turns each press into a relative camera pose
//!   (`geometry_msgs/msg/Pose`).
//!
//! [`TeleopSession`] binds a mapper to a host [`CommandSink`].
//!
//! ## Key layout
//!
//! | Key | Axis | Key | Axis |
//! |-----|------|-----|------|
//! | w | +linear.x | s | -linear.x |
//! | a | +linear.y | d | -linear.y |
//! | q | +linear.z | e | -linear.z |
//! | u | +angular.x | o | -angular.x |
//! | k | +angular.y | i | -angular.y |
//! | j | +angular.z | l | -angular.z |

mod command;
mod key;
mod mapper;
mod pose;
mod session;
mod traits;

pub use command::{CommandMessage, PoseCommand, Quaternion, Vector3, VelocityCommand};
pub use key::{ActiveKeySet, Axis, KeyAction, KeyEvent, TeleopKey};
pub use mapper::{KeyCommandMapper, MapperConfig, MapperState};
pub use pose::{PoseCommandMapper, PoseMapperConfig, euler_deg_to_quaternion};
pub use session::{CommandSink, TeleopSession};
pub use traits::CommandMapper;

#[cfg(test)]
pub(crate) use session::tests::{RecordingSink, SinkCall};
