use thermolink_protocol::TuningCommand;
use thermolink_serial::{LinkWriter, SerialLink};

use crate::cmd::TuneArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_tuning_sent, OutputFormat};

pub fn run(args: TuneArgs, format: OutputFormat) -> CliResult<i32> {
    let link = SerialLink::open_with_baud(&args.port, args.baud)
        .map_err(|err| link_error("open failed", err))?;

    let tuning = TuningCommand::new(args.tmin, args.tamb_min, args.tmax);
    let mut writer = LinkWriter::new(link);
    writer
        .send_tuning(&tuning)
        .map_err(|err| link_error("write failed", err))?;

    print_tuning_sent(&tuning, format);
    Ok(SUCCESS)
}
