use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::hex::{parse_hex_frame, HexFrame};

#[derive(Debug, Parser)]
#[command(name = "tailcopy", version, about = "Reflect ICMP frames at the XDP hook via a tail call")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the eBPF object and attach the classifier to an interface.
    Attach(AttachArgs),
    /// Run one frame through the pipeline in userspace.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct AttachArgs {
    #[arg(short, long, default_value = "eth0")]
    pub iface: String,

    /// Compiled eBPF object holding `classify_icmp` and `reflect`.
    #[arg(short, long)]
    pub object: PathBuf,

    /// Use generic (skb) XDP instead of the driver hook.
    #[arg(long)]
    pub skb_mode: bool,

    /// Leave the reflect slot empty so matched frames fall through.
    #[arg(long)]
    pub leave_unregistered: bool,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Frame bytes in hex, starting at the Ethernet header. `:`, `-` and
    /// whitespace between digits are ignored.
    #[arg(short, long, value_parser = parse_hex_frame)]
    pub frame: HexFrame,

    #[arg(long)]
    pub leave_unregistered: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_args() {
        let cli = Cli::try_parse_from([
            "tailcopy",
            "attach",
            "--iface",
            "veth0",
            "--object",
            "target/bpfel-unknown-none/release/tailcopy",
            "--skb-mode",
        ])
        .unwrap();

        let Command::Attach(args) = cli.command else {
            panic!("expected attach");
        };
        assert_eq!(args.iface, "veth0");
        assert_eq!(
            args.object,
            PathBuf::from("target/bpfel-unknown-none/release/tailcopy")
        );
        assert!(args.skb_mode);
        assert!(!args.leave_unregistered);
    }

    #[test]
    fn attach_defaults_to_eth0() {
        let cli = Cli::try_parse_from(["tailcopy", "attach", "-o", "prog.o"]).unwrap();

        let Command::Attach(args) = cli.command else {
            panic!("expected attach");
        };
        assert_eq!(args.iface, "eth0");
        assert!(!args.skb_mode);
    }

    #[test]
    fn attach_requires_object() {
        assert!(Cli::try_parse_from(["tailcopy", "attach"]).is_err());
    }

    #[test]
    fn simulate_args() {
        let cli = Cli::try_parse_from([
            "tailcopy",
            "simulate",
            "--frame",
            "aa:bb",
            "--leave-unregistered",
        ])
        .unwrap();

        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.frame.as_bytes(), &[0xaa, 0xbb]);
        assert!(args.leave_unregistered);
    }

    #[test]
    fn simulate_rejects_bad_hex() {
        assert!(Cli::try_parse_from(["tailcopy", "simulate", "--frame", "abc"]).is_err());
        assert!(Cli::try_parse_from(["tailcopy", "simulate", "--frame", "zz"]).is_err());
    }
}
