use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thermolink_serial::{EventReader, LinkError, SerialLink};

use crate::cmd::WatchArgs;
use crate::exit::{link_error, CliError, CliResult, SUCCESS};
use crate::output::{print_event, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let mut link = SerialLink::open_with_baud(&args.port, args.baud)
        .map_err(|err| link_error("open failed", err))?;

    if args.reset {
        link.pulse_reset()
            .map_err(|err| link_error("reset failed", err))?;
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut reader = EventReader::new(link);
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let msg = match reader.try_next() {
            Ok(Some(msg)) => msg,
            Ok(None) => continue,
            Err(LinkError::Disconnected) => {
                tracing::warn!("link closed");
                break;
            }
            Err(err) => return Err(link_error("read failed", err)),
        };

        if let Some(only) = &args.only {
            if !only.iter().any(|kind| kind.matches(&msg)) {
                continue;
            }
        }

        print_event(&msg, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
