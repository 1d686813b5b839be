//! Shared test harness modules for the Haulage CLI.

use super::*;

mod helpers;
mod solve_unit;
