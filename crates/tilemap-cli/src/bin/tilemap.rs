// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI entry point for the tilemap tools.

use anyhow::Result;
use tilemap_cli::cli::entrypoint;

fn main() -> Result<()> {
    entrypoint()
}
