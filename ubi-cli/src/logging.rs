use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "warn,ubi_cli=info";

// --- Formatter ---

/// Local-time timestamp, colored level, source location, then fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "\x1b[2m")?
        }
        write!(writer, "{} ", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
        if ansi {
            write!(writer, "\x1b[0m")?
        }

        let (pre, post) = if ansi {
            match *meta.level() {
                Level::ERROR => ("\x1b[1;31m", "\x1b[0m"),
                Level::WARN => ("\x1b[1;33m", "\x1b[0m"),
                Level::INFO => ("\x1b[1;32m", "\x1b[0m"),
                Level::DEBUG => ("\x1b[1;34m", "\x1b[0m"),
                Level::TRACE => ("\x1b[1;35m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };
        write!(writer, "{}{:>5}{} ", pre, meta.level(), post)?;

        if ansi {
            write!(writer, "\x1b[36m{}\x1b[0m ", meta.target())?;
        } else {
            write!(writer, "{} ", meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

/// A MakeWriter that can be pointed at a file after initialization.
/// While no file is set, all writes are discarded.
#[derive(Clone)]
struct FileSlot(Arc<Mutex<Option<File>>>);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Statics ---

type SetStrFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

static SET_LOG_LEVEL: OnceLock<SetStrFn> = OnceLock::new();
static FILE_SLOT: OnceLock<Arc<Mutex<Option<File>>>> = OnceLock::new();

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn store_level_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_LOG_LEVEL.set(Box::new(move |level_str: &str| {
        let filter = EnvFilter::try_new(level_str)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level_str}': {e}"))?;
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
    }));
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("error", "warn", "info", "debug", "trace")
/// or any full EnvFilter directive.
pub fn set_log_level(level: &str) -> Result<()> {
    match SET_LOG_LEVEL.get() {
        Some(f) => f(level),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Starts appending log output to `path`. The directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Initializes logging. Call once at startup.
///
/// - Stderr: colored when attached to a terminal, plain when piped, so
///   that report output on stdout stays clean.
/// - File: inactive until [`enable_file_logging`] is called.
/// - Level: `warn` (with `info` for this crate) unless `RUST_LOG` is set.
pub fn init_default_logging() {
    let file_inner: Arc<Mutex<Option<File>>> = Arc::new(Mutex::new(None));
    let _ = FILE_SLOT.set(file_inner.clone());

    let (level_filter, level_handle) = reload::Layer::new(make_filter());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(file_inner));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        store_level_handle(level_handle);
    }
}
