//! Sign-up domain models.
//!
//! Plain data types for the activity × window matrix. Position fields
//! (`index`, `activity_index`, `window_index`) are owned by
//! [`MatrixStore`](crate::matrix::MatrixStore); the models themselves carry
//! no invariants beyond their own fields.
//!
//! # Domain Mappings
//!
//! | u-signup | Matrix role | Example |
//! |----------|-------------|---------|
//! | Activity | Column | "Registration desk" |
//! | Window | Row | "Sat 9:00–11:00" |
//! | Slot | Cell | Registration desk on Saturday morning |
//! | Volunteer | Booker | A person holding RSVPs |
//! | Detail | Form field | "T-shirt size" |

mod activity;
mod changes;
mod detail;
mod slot;
mod volunteer;
mod window;

pub use activity::Activity;
pub use changes::{ActivityChanges, DetailChanges, SlotChanges, VolunteerChanges, WindowChanges};
pub use detail::{Detail, DetailType};
pub use slot::{Slot, SlotCoord};
pub use volunteer::{DetailValue, Volunteer, VolunteerKey};
pub use window::Window;

/// Largest non-zero volunteer cap accepted anywhere (0 = unlimited).
pub const MAX_VOLUNTEER_CAP: u32 = 255;
