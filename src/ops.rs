// The engine follows the dotnet Decimal (and before it, OLE Automation) calculation routines.
// A huge thank you to all the contributors to that project whose work has inspired the solutions
// found here.

mod add;
mod cmp;
pub(crate) mod common;
mod div;
mod mul;
mod rem;
mod round;

pub(crate) use add::{add_impl, sub_impl};
pub(crate) use cmp::cmp_impl;
pub(crate) use div::div_impl;
pub(crate) use mul::mul_impl;
pub(crate) use rem::rem_impl;
pub(crate) use round::{round_impl, round_magnitude};
