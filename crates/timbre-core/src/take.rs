use std::path::{Path, PathBuf};

/// Next unused output path for a case, probing `<case>_<idx>.wav`
///
/// Take indices are zero-padded to three digits. Probing starts at
/// `start_idx` and increments until a name that does not exist yet is
/// found, so repeated runs keep earlier takes instead of overwriting them.
pub fn next_take_path(out_dir: &Path, case: &str, start_idx: usize) -> PathBuf {
    let mut idx = start_idx;
    loop {
        let candidate = out_dir.join(format!("{case}_{idx:03}.wav"));
        if !candidate.exists() {
            return candidate;
        }
        idx += 1;
    }
}

/// Case label for a 1-based batch line, e.g. `line0007`
pub fn line_case_label(line_no: usize) -> String {
    format!("line{line_no:04}")
}
