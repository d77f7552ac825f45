use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("thermolink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: thermolink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("default_baud: {}", thermolink_serial::DEFAULT_BAUD);
    println!(
        "protocol: sync=0x{:02X} max_payload={}",
        thermolink_protocol::SYNC,
        thermolink_protocol::MAX_PAYLOAD
    );

    Ok(SUCCESS)
}
