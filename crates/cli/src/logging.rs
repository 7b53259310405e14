// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing bootstrap: env-filter driven by `-v/--verbose`, writing to an
//! append-mode log file when `-l/--log-file` is given, stderr otherwise.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

struct SharedFile(Arc<File>);

impl Write for SharedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.0).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.0).flush()
    }
}

#[derive(Clone)]
struct FileWriter(Arc<File>);

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = SharedFile;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFile(self.0.clone())
    }
}

pub fn init(log_file: Option<&Path>, verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_writer(FileWriter(Arc::new(file))).init();
        }
        None => builder.init(),
    }
    Ok(())
}
