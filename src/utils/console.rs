//! 控制台行输入
//!
//! 每次都从进程级的 `std::io::stdin()` 读取，多次调用之间不会丢失已缓冲的输入

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

/// 写出提示后读取一行，输入已关闭时返回 `None`
pub fn read_line_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<Option<String>> {
    output.write_all(message.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// 在阻塞线程里读取标准输入的一行（去掉首尾空白）
pub async fn read_line(message: String) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let stdout = io::stdout();
        read_line_from(&mut stdin.lock(), &mut stdout.lock(), &message)
    })
    .await
    .context("等待输入的任务异常结束")?
    .context("读取标准输入失败")?;

    match line {
        Some(line) => Ok(line),
        None => bail!("标准输入已关闭"),
    }
}
