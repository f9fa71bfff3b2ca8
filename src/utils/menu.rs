//! 终端选择菜单
//!
//! ↑/↓ 移动，Enter 确定，Ctrl-C 退出

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

/// 离开作用域时恢复终端
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show);
        let _ = terminal::disable_raw_mode();
    }
}

/// 显示选项并返回被选中的下标
pub fn choose(title: &str, options: &[&str]) -> io::Result<usize> {
    if options.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "没有可选的选项"));
    }

    let mut stdout = io::stdout();
    execute!(stdout, Print(format!("{}\r\n", title)))?;

    let _guard = RawModeGuard::enable()?;
    let mut selected = 0;
    render(&mut stdout, options, selected, false)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Up => selected = previous_index(selected, options.len()),
            KeyCode::Down => selected = next_index(selected, options.len()),
            KeyCode::Enter => return Ok(selected),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "已取消"));
            }
            _ => continue,
        }
        render(&mut stdout, options, selected, true)?;
    }
}

fn render(out: &mut impl Write, options: &[&str], selected: usize, redraw: bool) -> io::Result<()> {
    if redraw {
        queue!(out, MoveUp(options.len() as u16))?;
    }
    for (index, option) in options.iter().enumerate() {
        let marker = if index == selected { "❯" } else { " " };
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("{} {}\r\n", marker, option))
        )?;
    }
    out.flush()
}

fn previous_index(current: usize, len: usize) -> usize {
    if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps_around() {
        assert_eq!(previous_index(0, 4), 3);
        assert_eq!(next_index(3, 4), 0);
        assert_eq!(next_index(1, 4), 2);
    }
}
