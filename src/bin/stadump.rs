//! Dump the station table of a wireless interface.
//!
//! `stadump dev wlan0` asks the 802.11 stack for every peer
//! associated with the interface and prints one telemetry report per
//! station. `mac` narrows the query to a single peer and `-b` trims
//! the output to one hardware address per line.

use std::{env, process, str::FromStr};

use stadump::{
    consts::nl::NlFamily,
    err::Error,
    socket::{self, NlSocket},
    station::{MacAddr, ReportClock, StationReport},
};

struct Cli {
    dev: String,
    mac: Option<String>,
    brief: bool,
}

/// Returns true if `prefix` is a non-empty prefix of `word`.
fn matches(prefix: &str, word: &str) -> bool {
    !prefix.is_empty() && word.starts_with(prefix)
}

fn usage(argv0: &str) -> ! {
    println!(
        "Usage:   {} [options] [command value] ... [command value]\n\
         options: -b\tshow brief only\n\
         command: dev | mac | help\n\
         \n\
         Example: {} dev wlan0 mac 00:ff:12:a3:e3\n\
         \x20        {} dev wlan0\n",
        argv0, argv0, argv0
    );
    process::exit(1);
}

fn incomplete_command() -> ! {
    eprintln!("Command line is not complete. Try option \"help\"");
    process::exit(1);
}

fn next_value(args: &mut env::Args) -> String {
    match args.next() {
        Some(value) => value,
        None => incomplete_command(),
    }
}

fn parse_args() -> Cli {
    let mut args = env::args();
    let argv0 = args.next().unwrap_or_else(|| "stadump".to_string());
    let mut dev = None;
    let mut mac = None;
    let mut brief = false;

    while let Some(word) = args.next() {
        if matches(&word, "dev") {
            dev = Some(next_value(&mut args));
        } else if matches(&word, "mac") {
            mac = Some(next_value(&mut args));
        } else if matches(&word, "help") {
            usage(&argv0);
        } else if matches(&word, "-b") {
            brief = true;
        } else {
            usage(&argv0);
        }
    }

    match dev {
        Some(dev) => Cli { dev, mac, brief },
        None => incomplete_command(),
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mac = match cli.mac.as_deref() {
        Some(arg) => Some(MacAddr::from_str(arg)?),
        None => None,
    };
    let ifindex = socket::if_name_to_index(&cli.dev)?;

    let mut sock = NlSocket::connect(NlFamily::Generic, 0)?;
    let family = socket::resolve_genl_family(&mut sock, "nl80211")?;
    let request = socket::build_get_station(family, ifindex, mac.as_ref(), socket::next_seq())?;
    sock.send(&request)?;

    let brief = cli.brief;
    socket::dump_stations(&mut sock, family, |payload| {
        let report = StationReport::decode(payload);
        let mut out = String::new();
        if brief {
            report.render_brief(&mut out);
            print!("{}", out);
        } else {
            let clock = ReportClock::sample();
            match report.render(&mut out, &clock) {
                Ok(()) => print!("{}", out),
                Err(missing) => {
                    // Partial header lines still go out before the
                    // message is skipped.
                    print!("{}", out);
                    eprintln!("{}", missing);
                }
            }
        }
    })
}

fn main() {
    env_logger::init();
    let cli = parse_args();
    if let Err(err) = run(&cli) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::matches;

    #[test]
    fn test_prefix_matcher() {
        assert!(matches("d", "dev"));
        assert!(matches("de", "dev"));
        assert!(matches("dev", "dev"));
        assert!(matches("m", "mac"));
        assert!(matches("-", "-b"));
        assert!(matches("h", "help"));

        assert!(!matches("", "dev"));
        assert!(!matches("devx", "dev"));
        assert!(!matches("x", "dev"));
    }
}
