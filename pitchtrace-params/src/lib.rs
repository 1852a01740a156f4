//! Analysis parameters for Praat's autocorrelation pitch tracker.
//!
//! The parameter set is closed: ten knobs, each with a documented default.
//! User overrides are merged over the defaults by [`resolve`], which drops
//! unrecognized keys with a warning and always reconciles the pitch floor
//! against the time step (see [`reconcile_floor`]).
//!
//! # Example
//!
//! ```
//! use pitchtrace_params::{resolve, ParameterOverrides};
//!
//! let overrides = ParameterOverrides::new()
//!     .set("time_step", 0.01)
//!     .set("pitch_floor", 70)
//!     .set("pitch_ceiling", 500);
//!
//! let params = resolve(Some(&overrides));
//! assert_eq!(params.pitch_ceiling, 500.0);
//! ```

mod error;
mod key;
mod resolve;
mod set;
mod value;

pub use error::{ParamsError, Result};
pub use key::ParameterKey;
pub use resolve::{
    reconcile_floor, resolve, resolve_detailed, ParameterWarning, Resolution,
    MIN_FRAME_SHIFT_RATIO, PERIODS_PER_WINDOW,
};
pub use set::ParameterSet;
pub use value::{ParameterOverrides, ParameterValue};
