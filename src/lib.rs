//! A decoder for the `.FPH` data files written by Fisher & Paykel ICON CPAP
//! devices.
//!
//! An `.FPH` file opens with a 512 byte text header, followed by a body of
//! fixed-size little-endian records. This crate validates the header, then
//! unpacks each record according to a declarative layout, turning bit-packed
//! dates and scaled durations into meaningful values.
//!
//! Most users should begin with [`avec::FphFile`], or with the decoders and
//! derive macro in the [`avec`] module when records should land in their own
//! types. The layouts, transforms and header parser themselves live in the
//! [`sans`] module, which performs no I/O.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based decoder, file variants and CSV export
//!   (default).
//! - `cli`: build the `fph2csv` binary.

pub mod avec;
pub mod sans;
