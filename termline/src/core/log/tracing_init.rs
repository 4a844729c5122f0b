// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{TracingConfig, WriterConfig, try_create_rolling_file_appender};
use miette::IntoDiagnostic as _;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt as _, registry::LookupSpan,
                         util::SubscriberInitExt as _};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

impl TracingConfig {
    /// Install as the global default subscriber. Returns `Ok(false)` if the
    /// configuration doesn't produce any output layer, in which case nothing is
    /// installed.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created or a global subscriber is
    /// already installed.
    pub fn install_global(self) -> miette::Result<bool> {
        match try_create_layers(self)? {
            Some(layers) => {
                tracing_subscriber::registry()
                    .with(layers)
                    .try_init()
                    .into_diagnostic()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Install for the current thread only, until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file can't be created.
    pub fn install_thread_local(
        self,
    ) -> miette::Result<Option<tracing::subscriber::DefaultGuard>> {
        Ok(try_create_layers(self)?.map(|layers| {
            tracing_subscriber::registry().with(layers).set_default()
        }))
    }
}

/// Returns the layers. This does not initialize the tracing system. Returns `None` for
/// [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    let Some(file_layer) = try_create_file_layer(
        tracing_config.get_level_filter(),
        tracing_config.get_writer_config(),
    )?
    else {
        return Ok(None);
    };

    let layers: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![
        // Set the level filter from the tracing configuration.
        Box::new(tracing_config.get_level_filter()),
        file_layer,
    ];

    Ok(Some(layers))
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// This is useful for composition of layers. There's more info in the docs
/// [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/layer/index.html#runtime-configuration-with-layers).
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    // Shared configuration regardless of where logs are output to.
    let fmt_layer = create_fmt!();

    Ok(match writer_config {
        WriterConfig::File(tracing_log_file_path) => {
            let file = try_create_rolling_file_appender(tracing_log_file_path.as_str())?;
            Some(Box::new(fmt_layer.with_writer(file).with_filter(level_filter)))
        }
        WriterConfig::None => None,
    })
}
