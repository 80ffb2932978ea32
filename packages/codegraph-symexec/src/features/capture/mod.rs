/*
 * Capture / Alias Resolution
 *
 * Maps a write-target expression to the symbol whose storage it affects:
 * - unwraps parenthesization and conversions
 * - follows flow-capture references through the state's capture map
 * - follows closure captures (inner symbol → enclosing symbol) to a fixed point
 *
 * Anything that cannot be tracked soundly (array elements, fields on foreign receivers,
 * invocation results) resolves to no symbol.
 */

pub mod application;

pub use application::resolve_capture;
