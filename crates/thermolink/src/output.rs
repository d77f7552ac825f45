use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use thermolink_protocol::{CamMessage, TuningCommand};
use thermolink_serial::{SerialPortInfo, SerialPortType};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Print one decoded camera event to stdout.
///
/// Table format falls back to the pretty one-liner — an event stream is not
/// tabular data.
pub fn print_event(msg: &CamMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&event_json(msg)).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => match msg {
            CamMessage::Image(pixels) => {
                let (min, max, mean) = pixel_stats(pixels);
                println!(
                    "image pixels={} min={min:.2} max={max:.2} mean={mean:.2}",
                    pixels.len()
                );
            }
            CamMessage::DebugLog { index, text } => {
                println!("log[{index}] {text}");
            }
            CamMessage::Timings(t) => {
                println!(
                    "timings frame_fetch={}ms frame_tx_time={}ms calc_time={}ms",
                    t.frame_fetch, t.frame_tx_time, t.calc_time
                );
            }
            CamMessage::Analysis(a) => {
                println!("analysis cx={:.2} cy={:.2}", a.cx, a.cy);
            }
        },
    }
}

fn event_json(msg: &CamMessage) -> serde_json::Value {
    let kind = msg.kind();
    match msg {
        CamMessage::Image(pixels) => {
            let (min, max, mean) = pixel_stats(pixels);
            json!({
                "kind": kind,
                "pixels": pixels.len(),
                "min": min,
                "max": max,
                "mean": mean,
                "data": pixels,
            })
        }
        CamMessage::DebugLog { index, text } => json!({
            "kind": kind,
            "index": index,
            "text": text,
        }),
        CamMessage::Timings(t) => json!({
            "kind": kind,
            "frame_fetch": t.frame_fetch,
            "frame_tx_time": t.frame_tx_time,
            "calc_time": t.calc_time,
        }),
        CamMessage::Analysis(a) => json!({
            "kind": kind,
            "cx": a.cx,
            "cy": a.cy,
        }),
    }
}

fn pixel_stats(pixels: &[f32]) -> (f32, f32, f32) {
    if pixels.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    for &px in pixels {
        min = min.min(px);
        max = max.max(px);
        sum += f64::from(px);
    }
    (min, max, (sum / pixels.len() as f64) as f32)
}

#[derive(Serialize)]
struct PortOutput<'a> {
    path: &'a str,
    kind: &'a str,
    description: Option<String>,
}

/// Print the enumerated serial ports.
pub fn print_ports(ports: &[SerialPortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<PortOutput> = ports.iter().map(port_output).collect();
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "DESCRIPTION"]);
            for port in ports {
                let out = port_output(port);
                table.add_row(vec![
                    out.path.to_string(),
                    out.kind.to_string(),
                    out.description.unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for port in ports {
                let out = port_output(port);
                match out.description {
                    Some(desc) => println!("{} ({}, {desc})", out.path, out.kind),
                    None => println!("{} ({})", out.path, out.kind),
                }
            }
        }
    }
}

fn port_output(port: &SerialPortInfo) -> PortOutput<'_> {
    let (kind, description) = match &port.port_type {
        SerialPortType::UsbPort(usb) => ("usb", usb.product.clone()),
        SerialPortType::PciPort => ("pci", None),
        SerialPortType::BluetoothPort => ("bluetooth", None),
        SerialPortType::Unknown => ("unknown", None),
    };
    PortOutput {
        path: &port.port_name,
        kind,
        description,
    }
}

/// Print the confirmation after a tuning frame was written.
pub fn print_tuning_sent(tuning: &TuningCommand, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                json!({
                    "sent": true,
                    "tmin": tuning.tmin,
                    "tamb_min": tuning.tamb_min,
                    "tmax": tuning.tmax,
                })
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!(
                "sent tuning tmin={} tamb_min={} tmax={}",
                tuning.tmin, tuning.tamb_min, tuning.tmax
            );
        }
    }
}
