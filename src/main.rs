//! assoc-proc: demonstration driver for the associative processor.
//!
//! Runs the demonstration tasks on freshly randomized memories:
//!
//! - task 0: raw diagonal grid next to its normal view
//! - task 1: logical functions f2, f7, f8, f13 over word columns
//! - task 2: search for words inside an interval
//! - task 3: masked field sum

use std::env;

use anyhow::{bail, Context};
use assoc_proc::bits::format_address;
use assoc_proc::config::Config;
use assoc_proc::processor::{
    AssociativeProcessor, LoadMode, LogicFunction, ProcessorError, StoreMode,
};

const TASKS: [u8; 4] = [0, 1, 2, 3];

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    if args.iter().any(|a| a == "--sample-config") {
        print!("{}", Config::sample_config());
        return Ok(());
    }

    let mut tasks = Vec::new();
    for arg in &args[1..] {
        if arg.starts_with('-') {
            bail!("unknown option '{}'", arg);
        }
        let task: u8 = arg
            .parse()
            .with_context(|| format!("task must be a number, got '{}'", arg))?;
        if !TASKS.contains(&task) {
            bail!("unknown task {} (expected one of {:?})", task, TASKS);
        }
        tasks.push(task);
    }
    if tasks.is_empty() {
        tasks.extend(TASKS);
    }

    let config = Config::get();
    for task in tasks {
        let processor = AssociativeProcessor::new(config.new_memory());
        match task {
            0 => task_layout(processor),
            1 => task_logic(processor)?,
            2 => task_interval(processor)?,
            3 => task_masked_sum(processor)?,
            _ => unreachable!("task list is validated above"),
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Usage: assoc-proc [TASK...]");
    println!();
    println!("Tasks:");
    println!("  0   show the diagonal memory and its normal view");
    println!("  1   logical functions f2 f7 f8 f13 over word columns");
    println!("  2   search for words inside an interval");
    println!("  3   masked sum of fields Aj + Bj where Vj matches the mask");
    println!();
    println!("Options:");
    println!("  --sample-config   print a sample configuration file");
    println!("  -h, --help        show this message");
    println!();
    println!("Without tasks, all of them run in order.");
}

fn print_header(title: &str) {
    println!("{}", "____".repeat(25));
    println!("{}", title);
}

fn print_state(label: &str, processor: &AssociativeProcessor) {
    println!();
    println!("{}:", label);
    println!("{}", processor.memory_as_normal());
}

fn task_layout(processor: AssociativeProcessor) {
    println!("Associative Memory Array: {}", processor.memory());
    println!();
    println!("Diagonal addressing is hard to read, so the normal view follows:");
    println!("{}", processor.memory_as_normal());
}

fn task_logic(mut processor: AssociativeProcessor) -> anyhow::Result<()> {
    print_header("TASK1 f2 f7 f8 f13 [logical functions over word columns]");
    print_state("initial state", &processor);

    let steps = [
        (LogicFunction::Inhibition, 0x0, 0x1, 0x2),
        (LogicFunction::Disjunction, 0x3, 0x4, 0x5),
        (LogicFunction::PeirceArrow, 0x6, 0x7, 0x8),
        (LogicFunction::Implication, 0x9, 0xA, 0xB),
    ];
    for (func, x1, x2, dest) in steps {
        println!();
        println!("{} | {}", func, func.formula());
        println!(
            "{} = {}({}, {})",
            format_address(dest),
            func,
            format_address(x1),
            format_address(x2)
        );
        apply_logic(&mut processor, func, x1, x2, dest)
            .with_context(|| format!("{} needs at least {} words", func, dest + 1))?;
    }

    print_state("after manipulations", &processor);
    Ok(())
}

/// `dest = func(x1, x2)` through the buffer register.
fn apply_logic(
    processor: &mut AssociativeProcessor,
    func: LogicFunction,
    x1: usize,
    x2: usize,
    dest: usize,
) -> Result<(), ProcessorError> {
    processor.load_bit_slice(x1, LoadMode::ToBuffer)?;
    processor.exec_logical_operation(x2, func)?;
    processor.store_bit_slice(dest, StoreMode::FromBuffer)
}

fn task_interval(mut processor: AssociativeProcessor) -> anyhow::Result<()> {
    print_header("TASK2 [search for words inside an interval]");
    print_state("initial state", &processor);

    // Memory is random, so the bounds are ordered by value, not by address.
    let flags = processor.slices_in_interval(0x0, 0x1)?;

    println!();
    println!("Words strictly between {} and {}:", format_address(0x0), format_address(0x1));
    for (address, inside) in flags.iter().enumerate() {
        println!("{} {}", format_address(address), inside as u8);
    }
    println!();
    println!("{}", processor.registers_dump());

    print_state("after manipulations", &processor);
    Ok(())
}

fn task_masked_sum(mut processor: AssociativeProcessor) -> anyhow::Result<()> {
    print_header("TASK3 [sum fields Aj and Bj in words Sj whose Vj matches V=000-111]");
    print_state("initial state", &processor);

    let updated = processor.masked_sum()?;
    println!();
    println!("{} words updated (key {})", updated, processor.mask().slice(0..3));

    print_state("after manipulations", &processor);
    Ok(())
}
