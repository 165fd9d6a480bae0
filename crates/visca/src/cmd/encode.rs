use visca_device::DeviceController;

use crate::cmd::EncodeArgs;
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_command, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.device.resolve()?;
    let controller =
        DeviceController::new(config).map_err(|err| device_error("invalid device config", err))?;

    let frame = controller
        .command(args.kind, args.preset)
        .map_err(|err| device_error("encode failed", err))?;
    tracing::debug!(kind = %args.kind, bytes = %frame.to_hex(), "encoded command");

    print_command(args.kind, &frame, format);
    Ok(SUCCESS)
}
