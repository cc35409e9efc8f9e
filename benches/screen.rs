//! Screen benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use tatami::{Color, Command, NullHooks, Screen, Sgr, WindowSize};

fn bench_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");
    let commands: Vec<Command> = "Hello, World! ".chars().map(Command::print).collect();
    group.throughput(Throughput::Elements(commands.len() as u64));

    group.bench_function("print_chars", |b| {
        b.iter(|| {
            let mut screen = Screen::new(WindowSize::new(80, 24), Some(1_000));
            let mut hooks = NullHooks;
            for command in &commands {
                screen.apply(command, &mut hooks);
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let mut commands = Vec::new();
    for i in 0..100 {
        for ch in format!("Line {i}: some text content here").chars() {
            commands.push(Command::print(ch));
        }
        commands.push(Command::MoveCursorToBeginOfLine);
        commands.push(Command::Linefeed);
    }

    group.bench_function("scroll_100_lines", |b| {
        b.iter(|| {
            let mut screen = Screen::new(WindowSize::new(80, 24), Some(1_000));
            let mut hooks = NullHooks;
            for command in &commands {
                screen.apply(command, &mut hooks);
            }
            black_box(screen)
        })
    });

    group.finish();
}

fn bench_sgr(c: &mut Criterion) {
    let mut group = c.benchmark_group("screen");

    let mut commands = Vec::new();
    for _ in 0..100 {
        commands.push(Command::MoveCursorTo { row: 1, column: 1 });
        commands.push(Command::ClearScreen);
        commands.push(Command::SetGraphicsRendition {
            commands: vec![Sgr::Bold, Sgr::Foreground(Color::Indexed(1))],
        });
        for ch in "Hello".chars() {
            commands.push(Command::print(ch));
        }
        commands.push(Command::SetGraphicsRendition {
            commands: vec![Sgr::Reset],
        });
    }

    group.bench_function("sgr_and_erase", |b| {
        b.iter(|| {
            let mut screen = Screen::new(WindowSize::new(80, 24), Some(1_000));
            let mut hooks = NullHooks;
            for command in &commands {
                screen.apply(command, &mut hooks);
            }
            black_box(screen)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_print, bench_scroll, bench_sgr);
criterion_main!(benches);
