// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use log::{error, info};
use shurup_gen::{DEFAULT_CACHE, DEFAULT_EXPR, DEFAULT_OUT, Options, process_tests};

/// Unit-test preprocessor: generates the shurup case registry.
#[derive(Parser)]
#[command(name = "shurup-gen", version, about)]
struct Cli {
    /// Regexp for names of files with tests
    #[arg(short, long, default_value = DEFAULT_EXPR)]
    expr: String,

    /// Caching file
    #[arg(short, long, default_value = DEFAULT_CACHE)]
    cache: PathBuf,

    /// Output file with the registry and `run_tests`
    #[arg(short, long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Directories to scan for tests
    #[arg(required = true)]
    root_directories: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let options = Options {
        roots: cli.root_directories,
        expr: cli.expr,
        cache: cli.cache,
        out: cli.out,
    };

    match process_tests(&options) {
        Ok(summary) => {
            info!(
                "{} file(s), {} scanned, {} group(s), {} case(s)",
                summary.files, summary.scanned, summary.groups, summary.cases
            );
            if summary.written {
                info!("wrote {}", options.out.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
