//! Generate testdata command implementation.
//!
//! Generates synthetic, well-formed thread dump files for testing and
//! demos. The output exercises every record kind the parser recognizes:
//! headers with CPU fragments, state lines, stack frames, both lock line
//! shapes, and optionally a two-thread deadlock cycle.

use anyhow::Context;
use chrono::Utc;
use rand::Rng;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Monitor addresses used by the generated deadlock cycle.
const DEADLOCK_LOCK_A: &str = "0x00000000e0000001";
const DEADLOCK_LOCK_B: &str = "0x00000000e0000002";

/// Call sites sampled for synthetic stack frames.
const FRAME_POOL: &[&str] = &[
    "com.example.app.Worker.process(Worker.java:57)",
    "com.example.app.Worker.run(Worker.java:31)",
    "com.example.queue.Poller.poll(Poller.java:118)",
    "com.example.io.SocketReader.read(SocketReader.java:204)",
    "java.util.concurrent.ThreadPoolExecutor$Worker.run(ThreadPoolExecutor.java:635)",
    "java.lang.Thread.run(Thread.java:833)",
];

/// `(state token, header descriptor, qualifier)` triples for worker threads.
const STATE_POOL: &[(&str, &str, &str)] = &[
    ("RUNNABLE", "runnable", ""),
    ("TIMED_WAITING", "waiting on condition", " (sleeping)"),
    ("WAITING", "waiting on condition", " (parking)"),
];

/// Builds the synthetic dump text.
pub fn synthesize_dump(threads: usize, with_deadlock: bool) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::new();

    let _ = writeln!(out, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    out.push_str("Full thread dump OpenJDK 64-Bit Server VM (17.0.8+7 mixed mode, sharing):\n\n");

    let mut thread_number = 1;

    if with_deadlock {
        push_deadlock_section(&mut out);
        push_deadlocked_thread(&mut out, &mut rng, "deadlock-a", &mut thread_number, DEADLOCK_LOCK_A, DEADLOCK_LOCK_B);
        push_deadlocked_thread(&mut out, &mut rng, "deadlock-b", &mut thread_number, DEADLOCK_LOCK_B, DEADLOCK_LOCK_A);
    }

    for i in 0..threads {
        push_worker_thread(&mut out, &mut rng, i, &mut thread_number);
    }

    out
}

fn push_deadlock_section(out: &mut String) {
    out.push_str("Found 1 Java-level deadlock:\n");
    out.push_str("=============================\n");
    let _ = writeln!(out, "\"deadlock-a\":");
    let _ = writeln!(out, "  - waiting to lock <{}> (a java.lang.Object)", DEADLOCK_LOCK_A);
    let _ = writeln!(out, "  which is held by \"deadlock-b\"");
    let _ = writeln!(out, "\"deadlock-b\":");
    let _ = writeln!(out, "  - waiting to lock <{}> (a java.lang.Object)", DEADLOCK_LOCK_B);
    let _ = writeln!(out, "  which is held by \"deadlock-a\"");
    out.push('\n');
}

fn push_deadlocked_thread(
    out: &mut String,
    rng: &mut impl Rng,
    name: &str,
    thread_number: &mut usize,
    waiting_for: &str,
    holding: &str,
) {
    push_header(out, rng, name, *thread_number, "waiting for monitor entry", None);
    *thread_number += 1;
    out.push_str("   java.lang.Thread.State: BLOCKED (on object monitor)\n");
    let _ = writeln!(out, "\tat {}", FRAME_POOL[0]);
    let _ = writeln!(out, "\t- waiting to lock <{}> (a java.lang.Object)", waiting_for);
    let _ = writeln!(out, "\t- locked <{}> (a java.lang.Object)", holding);
    let _ = writeln!(out, "\tat {}", FRAME_POOL[5]);
    out.push('\n');
}

fn push_worker_thread(out: &mut String, rng: &mut impl Rng, index: usize, thread_number: &mut usize) {
    let (state, descriptor, qualifier) = STATE_POOL[index % STATE_POOL.len()];
    let name = format!("worker-{}", index);
    let cpu_ms = rng.gen_range(0.0..500.0);

    push_header(out, rng, &name, *thread_number, descriptor, Some(cpu_ms));
    *thread_number += 1;
    let _ = writeln!(out, "   java.lang.Thread.State: {}{}", state, qualifier);

    let depth = rng.gen_range(2..=FRAME_POOL.len());
    for frame in &FRAME_POOL[FRAME_POOL.len() - depth..] {
        let _ = writeln!(out, "\tat {}", frame);
    }
    // Every third worker holds an ownable synchronizer.
    if index % 3 == 2 {
        let _ = writeln!(
            out,
            "\t- locked <{}> (java.util.concurrent.locks.ReentrantLock$NonfairSync)",
            hex_address(rng)
        );
    }
    out.push('\n');
}

fn push_header(
    out: &mut String,
    rng: &mut impl Rng,
    name: &str,
    thread_number: usize,
    descriptor: &str,
    cpu_ms: Option<f64>,
) {
    let timing = match cpu_ms {
        Some(cpu) => format!("cpu={:.2}ms elapsed={:.2}s ", cpu, rng.gen_range(1.0..600.0)),
        None => String::new(),
    };
    let _ = writeln!(
        out,
        "\"{}\" #{} prio=5 os_prio=0 {}tid={} nid={} {}  [{}]",
        name,
        thread_number,
        timing,
        hex_address(rng),
        hex_address(rng),
        descriptor,
        hex_address(rng)
    );
}

fn hex_address(rng: &mut impl Rng) -> String {
    format!("0x{:016x}", rng.gen::<u64>())
}

/// Generates a synthetic thread dump file for testing purposes.
pub fn command_generate_testdata(
    output: PathBuf,
    threads: usize,
    with_deadlock: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(
        "Generating test dump: threads={}, with_deadlock={}, output={}",
        threads,
        with_deadlock,
        output.display()
    );

    let dump = synthesize_dump(threads, with_deadlock);
    fs::write(&output, &dump)
        .with_context(|| format!("could not write test dump to {}", output.display()))?;

    println!("✅ Generated test dump: {}", output.display());
    println!("   Threads: {}", threads + if with_deadlock { 2 } else { 0 });
    if with_deadlock {
        println!("   Includes a two-thread deadlock cycle");
    }
    Ok(())
}
