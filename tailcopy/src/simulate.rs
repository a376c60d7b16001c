use log::info;

use tailcopy_common::{Classifier, Pipeline, Reflector, Stage, Verdict};

use crate::cli::SimulateArgs;
use crate::hex::HexFrame;

/// Runs the frame through the same two stages the kernel programs
/// implement and returns the verdict with the frame as it leaves.
pub fn run(args: &SimulateArgs) -> (Verdict, HexFrame) {
    let classifier = Classifier::default();
    let reflector = Reflector;
    let next: Option<&dyn Stage> = if args.leave_unregistered {
        None
    } else {
        Some(&reflector)
    };
    let pipeline = Pipeline::standard(&classifier, next);

    info!("simulating {} byte frame", args.frame.as_bytes().len());
    let mut frame = args.frame.clone().into_bytes();
    let verdict = pipeline.run(&mut frame);

    (verdict, HexFrame::from(frame))
}
