//! Property tests for the screen invariants
//!
//! Arbitrary command sequences must leave the grid shape, cursor bounds,
//! margins, and history bound intact after every single command.

use proptest::prelude::*;

use tatami::core::snapshot::Snapshot;
use tatami::{Command, Mode, NullHooks, Screen, Sgr, TabClear, WindowSize};

const COLUMNS: usize = 80;
const ROWS: usize = 24;
const HISTORY_BOUND: usize = 50;

fn count() -> impl Strategy<Value = usize> {
    1usize..200
}

fn printables() -> impl Strategy<Value = Command> {
    prop_oneof![
        any::<char>().prop_map(Command::print),
        any::<char>().prop_map(|codepoint| Command::AppendChar {
            codepoint,
            consecutive: true,
        }),
        Just(Command::Linefeed),
        Just(Command::Backspace),
        Just(Command::MoveCursorToBeginOfLine),
    ]
}

fn relative_motion() -> impl Strategy<Value = Command> {
    prop_oneof![
        count().prop_map(|count| Command::MoveCursorUp { count }),
        count().prop_map(|count| Command::MoveCursorDown { count }),
        count().prop_map(|count| Command::MoveCursorForward { count }),
        count().prop_map(|count| Command::MoveCursorBackward { count }),
        count().prop_map(|count| Command::CursorNextLine { count }),
        count().prop_map(|count| Command::CursorPreviousLine { count }),
        count().prop_map(|count| Command::MoveCursorToNextTab { count }),
        count().prop_map(|count| Command::CursorBackwardTab { count }),
    ]
}

fn absolute_motion() -> impl Strategy<Value = Command> {
    prop_oneof![
        (1usize..100, 1usize..200)
            .prop_map(|(row, column)| Command::MoveCursorTo { row, column }),
        (1usize..200).prop_map(|column| Command::MoveCursorToColumn { column }),
        (1usize..100).prop_map(|row| Command::MoveCursorToLine { row }),
        Just(Command::Index),
        Just(Command::ReverseIndex),
        Just(Command::BackIndex),
        Just(Command::ForwardIndex),
        Just(Command::HorizontalTabSet),
        Just(Command::HorizontalTabClear {
            which: TabClear::All
        }),
    ]
}

fn erases() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::ClearToEndOfLine),
        Just(Command::ClearToBeginOfLine),
        Just(Command::ClearLine),
        Just(Command::ClearToEndOfScreen),
        Just(Command::ClearToBeginOfScreen),
        Just(Command::ClearScreen),
        Just(Command::ClearScrollbackBuffer),
        (1usize..120).prop_map(|count| Command::EraseCharacters { count }),
    ]
}

fn scrolls_and_shifts() -> impl Strategy<Value = Command> {
    prop_oneof![
        (1usize..10).prop_map(|count| Command::ScrollUp { count }),
        (1usize..10).prop_map(|count| Command::ScrollDown { count }),
        (1usize..10).prop_map(|count| Command::InsertLines { count }),
        (1usize..10).prop_map(|count| Command::DeleteLines { count }),
        (1usize..10).prop_map(|count| Command::InsertColumns { count }),
        (1usize..10).prop_map(|count| Command::DeleteColumns { count }),
        (1usize..120).prop_map(|count| Command::InsertCharacters { count }),
        (1usize..120).prop_map(|count| Command::DeleteCharacters { count }),
    ]
}

fn margins_and_modes() -> impl Strategy<Value = Command> {
    let mode = prop_oneof![
        Just(Mode::AutoWrap),
        Just(Mode::Origin),
        Just(Mode::LeftRightMargin),
        Just(Mode::Insert),
        Just(Mode::UseAlternateScreen),
        Just(Mode::AlternateScreenSaveCursor),
    ];
    prop_oneof![
        (1usize..30, 1usize..30).prop_map(|(top, bottom)| Command::SetTopBottomMargin {
            top: Some(top),
            bottom: Some(bottom),
        }),
        (1usize..100, 1usize..100).prop_map(|(left, right)| Command::SetLeftRightMargin {
            left: Some(left),
            right: Some(right),
        }),
        (mode, any::<bool>()).prop_map(|(mode, enable)| Command::SetMode { mode, enable }),
    ]
}

fn state_and_resets() -> impl Strategy<Value = Command> {
    let sgr = prop_oneof![
        Just(vec![Sgr::Reset]),
        Just(vec![Sgr::Bold, Sgr::Faint]),
        Just(vec![Sgr::Underline, Sgr::CurlyUnderlined]),
        Just(vec![Sgr::Inverse]),
    ];
    prop_oneof![
        Just(Command::SaveCursor),
        Just(Command::RestoreCursor),
        Just(Command::ScreenAlignmentPattern),
        Just(Command::SetMark),
        Just(Command::SoftTerminalReset),
        Just(Command::FullReset),
        sgr.prop_map(|commands| Command::SetGraphicsRendition { commands }),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => printables(),
        2 => relative_motion(),
        2 => absolute_motion(),
        1 => erases(),
        1 => scrolls_and_shifts(),
        1 => margins_and_modes(),
        1 => state_and_resets(),
    ]
}

fn check_invariants(screen: &Screen) -> Result<(), TestCaseError> {
    let buffer = screen.buffer();
    let size = buffer.size();
    prop_assert_eq!(size, WindowSize::new(COLUMNS, ROWS));

    for row in 1..=ROWS {
        let line = buffer.line(row);
        prop_assert!(line.is_some());
        prop_assert_eq!(line.map(|l| l.len()), Some(COLUMNS));
    }

    let cursor = buffer.cursor();
    prop_assert!((1..=ROWS).contains(&cursor.row));
    prop_assert!((1..=COLUMNS).contains(&cursor.column));

    let margin = buffer.margin();
    prop_assert!(margin.vertical.from >= 1);
    prop_assert!(margin.vertical.from <= margin.vertical.to);
    prop_assert!(margin.vertical.to <= ROWS);
    prop_assert!(margin.horizontal.from >= 1);
    prop_assert!(margin.horizontal.from <= margin.horizontal.to);
    prop_assert!(margin.horizontal.to <= COLUMNS);

    prop_assert!(screen.history_line_count() <= HISTORY_BOUND);

    // wrapPending implies autowrap and a cursor parked at the right edge
    let snapshot = Snapshot::from_screen(screen);
    if snapshot.cursor.wrap_pending {
        prop_assert!(buffer.is_mode_enabled(Mode::AutoWrap));
        prop_assert!(cursor.column == margin.horizontal.to || cursor.column == COLUMNS);
    }

    for row in 1..=ROWS {
        if let Some(line) = buffer.line(row) {
            for cell in line.cells() {
                prop_assert!(cell.width() <= 2);
            }
        }
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_every_command(
        commands in proptest::collection::vec(command_strategy(), 0..120)
    ) {
        let mut screen = Screen::new(WindowSize::new(COLUMNS, ROWS), Some(HISTORY_BOUND));
        let mut hooks = NullHooks;
        for command in &commands {
            screen.apply(command, &mut hooks);
            check_invariants(&screen)?;
        }
    }

    #[test]
    fn full_reset_always_restores_initial_text(
        commands in proptest::collection::vec(command_strategy(), 0..60)
    ) {
        let mut screen = Screen::new(WindowSize::new(COLUMNS, ROWS), Some(HISTORY_BOUND));
        let mut hooks = NullHooks;
        for command in &commands {
            screen.apply(command, &mut hooks);
        }
        screen.apply(&Command::FullReset, &mut hooks);

        let fresh = Screen::new(WindowSize::new(COLUMNS, ROWS), Some(HISTORY_BOUND));
        prop_assert_eq!(screen.render_text(), fresh.render_text());
        prop_assert_eq!(screen.real_cursor_position(), fresh.real_cursor_position());
        prop_assert_eq!(screen.history_line_count(), 0);
    }
}
