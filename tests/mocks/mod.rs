//! Mock implementations for testing without a planning system.
//!
//! This module provides a configurable mock host that can simulate complete
//! plans, missing data, host faults, and panicking accessors.


pub use host::*;
