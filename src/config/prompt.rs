use crate::utils::error::{HarvestError, Result};
use std::io::{BufRead, Write};

/// 反覆詢問直到取得有效的數字 UID
pub fn prompt_owner_id<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<u64> {
    loop {
        write!(output, "請輸入UP主的UID: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(HarvestError::InputError {
                message: "No UID provided before end of input".to_string(),
            });
        }

        match line.trim().parse::<u64>() {
            Ok(uid) => return Ok(uid),
            Err(_) => writeln!(output, "請輸入有效的數字UID")?,
        }
    }
}
