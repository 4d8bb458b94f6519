// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line front end for the tilemap geometry tools.
//!
//! Every subcommand reads a JSON document (a path, or `-` for stdin) and
//! writes a JSON document to stdout or to `--out`.

pub mod cli;
