//! Decoding of header blocks and records held in memory.
//!
//! Nothing in this module reads from a file. Callers supply byte arrays of
//! the right size (see [`header::HEADER_SIZE`] and [`layout::Schema::size`])
//! and receive decoded values. See [`crate::avec`] for decoders covering
//! whole files.
//!
//! # Layouts
//!
//! A record body is described by a [`layout::Schema`]: an ordered list of
//! slots, each either a named field or a run of padding bytes. Fields carry
//! their numeric width and, where the raw integer needs reinterpreting, a
//! transform function (see [`transform`]). Schemas are `const` values, so the
//! byte size of a layout is known and checked at compile time.
//!
//! Some areas of the format are not interpreted:
//!
//! - The header carries a checksum byte whose algorithm is unknown. It is
//!   captured, but never verified. See the [`check`] module.
//!
//! - Field values are not range-checked. Pressures and event counts are
//!   passed through as found.

pub mod check;
pub mod header;
pub mod layout;
pub mod record;
pub mod transform;
