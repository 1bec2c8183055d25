// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated idle loop that exercises the tracing and diagnostics pipeline.
//!
//! Renders a table into a [`MemoryHost`] across simulated idle slices of
//! varying length, recording events to both a
//! [`PrettyPrintSink`](fibril_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](fibril_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file and prints the resulting markup.
//!
//! One row uses a tag the host refuses for the first few slices, to show a
//! failed unit being retried.

use std::fs::File;
use std::io::BufWriter;

use fibril_core::deadline::SimulatedDeadline;
use fibril_core::element::{self, Child, Element, Props};
use fibril_core::host::MemoryHost;
use fibril_core::scheduler::{SchedulerConfig, TickStatus, WorkLoop};
use fibril_core::time::Duration;
use fibril_core::trace::{TraceSink, Tracer};

use fibril_debug::Tee;
use fibril_debug::pretty::PrettyPrintSink;
use fibril_debug::recorder::RecorderSink;

const ROWS: u32 = 12;
/// Row whose cell tag is refused until [`HEAL_AT_SLICE`].
const FLAKY_ROW: u32 = 2;
const HEAL_AT_SLICE: usize = 4;
/// Idle budgets handed out in turn, in microseconds.
const BUDGETS_US: [u64; 5] = [600, 4_000, 12_000, 1_500, 9_000];
/// Simulated cost of one unit of work.
const UNIT_COST: Duration = Duration::from_micros(400);
/// Frame interval used to lay ticks out in the Chrome trace (~60 Hz).
const SLICE: Duration = Duration::from_micros(16_667);

fn row(i: u32) -> Element {
    let tag = if i == FLAKY_ROW { "blink" } else { "td" };
    element::build(
        "tr",
        Some(Props::new().with("className", if i % 2 == 0 { "even" } else { "odd" })),
        [
            Child::from(element::build(tag, None, [Child::from(i)])),
            Child::from(element::build(
                "td",
                None,
                [Child::from(format!("item {i}"))],
            )),
        ],
    )
}

fn table() -> Element {
    element::build(
        "table",
        Some(Props::new().with("id", "items")),
        (0..ROWS).map(|i| Child::from(row(i))),
    )
}

/// Ticks `work` once per simulated idle slice until the pass completes.
///
/// Returns the number of slices used and the slices whose tick failed.
fn run_slices(work: &mut WorkLoop<MemoryHost>, sink: &mut dyn TraceSink) -> (usize, Vec<usize>) {
    let deadline = SimulatedDeadline::new(Duration::ZERO, UNIT_COST);
    let mut failed = Vec::new();
    let mut slice_index = 0_usize;
    loop {
        if slice_index == HEAL_AT_SLICE {
            work.host_mut().accept_all_tags();
        }
        let budget = BUDGETS_US[slice_index % BUDGETS_US.len()];
        deadline.refill(Duration::from_micros(budget));

        match work.tick(&deadline, &mut Tracer::new(sink)) {
            Ok(report) if report.status == TickStatus::Completed => break,
            Ok(_) => {}
            Err(err) => {
                println!("slice {slice_index}: {err}; retrying next slice");
                failed.push(slice_index);
            }
        }
        slice_index += 1;
    }
    (slice_index + 1, failed)
}

fn main() {
    let table = table();
    let elements = table.subtree_len();

    // -- host --------------------------------------------------------------
    let mut host = MemoryHost::new();
    let container = host.create_container("body");
    host.reject_tag("blink");

    // -- sinks -------------------------------------------------------------
    let mut sink = Tee(
        PrettyPrintSink::new(Box::new(std::io::stdout())),
        RecorderSink::new(),
    );

    // -- work loop ---------------------------------------------------------
    let mut work = WorkLoop::new(host, SchedulerConfig::browser());
    work.render(table, container);

    // -- simulated idle loop -----------------------------------------------
    let (slices, _) = run_slices(&mut work, &mut sink);

    // -- export Chrome trace -----------------------------------------------
    let Tee(_, recorder) = sink;
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    fibril_debug::chrome::export(recorder.as_bytes(), SLICE, &mut writer)
        .expect("failed to write Chrome trace");

    println!();
    println!("{}", work.host().inner_markup(container));
    println!("Rendered {elements} elements in {slices} slices; wrote {path}");
}
