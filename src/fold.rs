use std::collections::HashSet;

/// Which bracket pair a foldable region spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldKind {
    Object,
    Array,
}

/// A contiguous span of text lines eligible for visual collapse.
///
/// Start and end lines carry the opening and closing bracket and stay
/// visible when the region is folded; only the lines strictly between them
/// are hidden. `element_count` is present for arrays only and comes from the
/// comma-count heuristic below, so it is indicative rather than exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    pub start_line: usize,
    pub end_line: usize,
    /// Nesting level at the opening line; top-level regions are level 1.
    pub level: usize,
    pub kind: FoldKind,
    pub folded: bool,
    pub element_count: Option<usize>,
}

/// Scans text lines for foldable object/array bodies.
///
/// A trimmed line ending with `{` or `[` opens a region; a trimmed line
/// starting with `}` or `]` closes the most recently opened one. The check
/// order matters: a line like `}, {` opens a region rather than closing one.
/// Unbalanced brackets leave residual open entries that are silently
/// discarded, so malformed input degrades to fewer regions instead of
/// failing. Regions are returned in closing order (inner before outer).
///
/// Array element counts are commas strictly between the bracket lines plus
/// one, or zero when the interior is blank. Commas inside nested strings and
/// structures are counted too; the number feeds a badge, nothing else.
pub fn detect_fold_regions(text: &str) -> Vec<FoldRegion> {
    let lines: Vec<&str> = text.split('\n').collect();

    // Per-line comma and non-blank counts, prefix-summed so each region's
    // interior is tallied without re-scanning it.
    let mut commas = vec![0usize; lines.len() + 1];
    let mut non_blank = vec![0usize; lines.len() + 1];
    for (i, line) in lines.iter().enumerate() {
        commas[i + 1] = commas[i] + line.matches(',').count();
        non_blank[i + 1] = non_blank[i] + usize::from(!line.trim().is_empty());
    }

    let mut regions = Vec::new();
    let mut stack: Vec<(usize, usize, FoldKind)> = Vec::new();
    let mut level = 0usize;

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.ends_with('{') {
            level += 1;
            stack.push((i, level, FoldKind::Object));
        } else if line.ends_with('[') {
            level += 1;
            stack.push((i, level, FoldKind::Array));
        } else if line.starts_with('}') || line.starts_with(']') {
            if let Some((start, start_level, kind)) = stack.pop() {
                let element_count = match kind {
                    FoldKind::Array => {
                        let interior_commas = commas[i] - commas[start + 1];
                        let interior_non_blank = non_blank[i] - non_blank[start + 1];
                        if interior_non_blank == 0 {
                            Some(0)
                        } else {
                            Some(interior_commas + 1)
                        }
                    }
                    FoldKind::Object => None,
                };
                regions.push(FoldRegion {
                    start_line: start,
                    end_line: i,
                    level: start_level,
                    kind,
                    folded: false,
                    element_count,
                });
            }
            level = level.saturating_sub(1);
        }
    }

    regions
}

/// Line numbers hidden by the currently folded regions: every line strictly
/// between a folded region's start and end.
pub fn hidden_lines(regions: &[FoldRegion]) -> HashSet<usize> {
    let mut hidden = HashSet::new();
    for region in regions.iter().filter(|r| r.folded) {
        hidden.extend(region.start_line + 1..region.end_line);
    }
    hidden
}

/// The text with folded interiors removed. The underlying text is never
/// mutated; this is a derived projection.
pub fn visible_text(text: &str, regions: &[FoldRegion]) -> String {
    let hidden = hidden_lines(regions);
    if hidden.is_empty() {
        return text.to_string();
    }
    text.split('\n')
        .enumerate()
        .filter(|(i, _)| !hidden.contains(i))
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flips one region's fold state.
pub fn toggle_region(regions: &mut [FoldRegion], index: usize) {
    if let Some(region) = regions.get_mut(index) {
        region.folded = !region.folded;
    }
}

/// One logical toggle over all top-level regions: folds them all if any is
/// currently unfolded, unfolds them all only when every one is already
/// folded.
pub fn toggle_top_level(regions: &mut [FoldRegion]) {
    let mut has_top_level = false;
    let mut all_folded = true;
    for region in regions.iter().filter(|r| r.level == 1) {
        has_top_level = true;
        all_folded &= region.folded;
    }
    if !has_top_level {
        return;
    }
    let target = !all_folded;
    for region in regions.iter_mut().filter(|r| r.level == 1) {
        region.folded = target;
    }
}

/// Unfolds everything, the reset applied before re-analyzing edited text.
pub fn unfold_all(regions: &mut [FoldRegion]) {
    for region in regions.iter_mut() {
        region.folded = false;
    }
}
