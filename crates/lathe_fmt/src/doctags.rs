//! Doc-tag repair: reconcile `@param` tags with the parameter list.
//!
//! Runs during the prepare pass on documented methods and constructors.
//! Three repairs, each reported as a warning: a tag for a parameter the
//! doc never mentions is inserted with stub text, a tag whose name is a
//! near-miss of an undocumented parameter is renamed, and a tag naming no
//! parameter at all is dropped once every parameter has its tag. Repairs
//! never fail the render.

use rustc_hash::FxHashMap;
use tracing::debug;

/// Placeholder description for synthesized tags.
const STUB_DESCRIPTION: &str = "TODO document";

/// One correction applied to a doc comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TagFix {
    /// A tag for this parameter was inserted.
    Inserted(String),
    /// A tag was renamed from a near-miss to the parameter it meant.
    Renamed { from: String, to: String },
    /// A tag naming no parameter was dropped.
    Dropped(String),
}

/// Result of a repair run: the rewritten doc text plus what changed.
#[derive(Clone, Debug)]
pub(crate) struct TagRepair {
    pub text: String,
    pub fixes: Vec<TagFix>,
}

/// Repair the `@param` tags of `doc` against `params`, in declaration
/// order. Returns `None` when the text already agrees with the signature.
pub(crate) fn repair_params(doc: &str, params: &[&str]) -> Option<TagRepair> {
    let mut fixes = Vec::new();

    // Claim tags by exact name, first come first served.
    let mut claimed: FxHashMap<&str, usize> = FxHashMap::default();
    let tags: Vec<(usize, String)> = doc
        .lines()
        .enumerate()
        .filter_map(|(i, line)| tag_name(line).map(|n| (i, n.to_owned())))
        .collect();
    for (idx, (_, name)) in tags.iter().enumerate() {
        if params.contains(&name.as_str()) && !claimed.contains_key(name.as_str()) {
            claimed.insert(name.as_str(), idx);
        }
    }

    // Rename near-miss tags onto undocumented parameters.
    let mut renames: FxHashMap<usize, &str> = FxHashMap::default();
    for (idx, (_, name)) in tags.iter().enumerate() {
        if claimed.get(name.as_str()) == Some(&idx) {
            continue;
        }
        let candidate = params
            .iter()
            .filter(|&&p| !claimed.contains_key(p))
            .map(|&p| (edit_distance(name, p), p))
            .min();
        if let Some((distance, param)) = candidate {
            if distance <= param.chars().count() / 2 {
                claimed.insert(param, idx);
                renames.insert(idx, param);
                fixes.push(TagFix::Renamed {
                    from: name.clone(),
                    to: param.to_owned(),
                });
            }
        }
    }

    // Drop the leftovers only when every parameter has a tag; an unclaimed
    // slot means the stray tag may still be the author's intent.
    let all_claimed = params.iter().all(|p| claimed.contains_key(p));
    let mut drops: Vec<usize> = Vec::new();
    for (idx, (_, name)) in tags.iter().enumerate() {
        let kept = claimed.get(name.as_str()) == Some(&idx) || renames.contains_key(&idx);
        if !kept && all_claimed {
            drops.push(idx);
            fixes.push(TagFix::Dropped(name.clone()));
        }
    }

    let missing: Vec<&str> = params
        .iter()
        .copied()
        .filter(|p| !claimed.contains_key(p))
        .collect();
    for &param in &missing {
        fixes.push(TagFix::Inserted(param.to_owned()));
    }

    if fixes.is_empty() {
        return None;
    }
    debug!(fixes = fixes.len(), "repairing doc tags");

    // Rewrite: renames and drops in place, insertions after the last tag
    // line (or at the end of the text when there is none).
    let last_tag_line = tags.iter().map(|&(line, _)| line).max();
    let mut out: Vec<String> = Vec::new();
    let mut tag_idx = 0;
    for (line_no, line) in doc.lines().enumerate() {
        let is_tag = tag_name(line).is_some();
        if is_tag {
            if drops.contains(&tag_idx) {
                tag_idx += 1;
            } else if let Some(param) = renames.get(&tag_idx) {
                out.push(rename_tag(line, param));
                tag_idx += 1;
            } else {
                out.push(line.to_owned());
                tag_idx += 1;
            }
        } else {
            out.push(line.to_owned());
        }
        if Some(line_no) == last_tag_line {
            for &param in &missing {
                out.push(format!("@param {param} {STUB_DESCRIPTION}"));
            }
        }
    }
    if last_tag_line.is_none() {
        for &param in &missing {
            out.push(format!("@param {param} {STUB_DESCRIPTION}"));
        }
    }

    Some(TagRepair {
        text: out.join("\n"),
        fixes,
    })
}

/// Name token of an `@param` line, if this line is one.
fn tag_name(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("@param")?;
    let rest = rest.strip_prefix(char::is_whitespace)?;
    let name = rest.split_whitespace().next()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Replace the name token of an `@param` line, keeping the description.
fn rename_tag(line: &str, param: &str) -> String {
    let Some(keyword) = line.find("@param") else {
        return line.to_owned();
    };
    // The name is the first token after the keyword. Replace it by
    // position; a textual search could match inside `@param` itself when
    // the old name is a substring of the keyword.
    let rest = &line[keyword + "@param".len()..];
    let pad = rest.len() - rest.trim_start().len();
    let name_len = rest
        .trim_start()
        .split_whitespace()
        .next()
        .map_or(0, str::len);
    if name_len == 0 {
        return line.to_owned();
    }
    let start = keyword + "@param".len() + pad;
    format!("{}{param}{}", &line[..start], &line[start + name_len..])
}

/// Levenshtein distance over characters.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { prev } else { prev + 1 };
            prev = row[j + 1];
            row[j + 1] = cost.min(row[j] + 1).min(prev + 1);
        }
    }
    row[b.len()]
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("count", "count"), 0);
        assert_eq!(edit_distance("cuont", "count"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn aligned_doc_needs_no_repair() {
        let doc = "Adds a value.\n@param value the value\n@param index where";
        assert!(repair_params(doc, &["value", "index"]).is_none());
    }

    #[test]
    fn missing_tag_inserted_after_existing_tags() {
        let doc = "Adds a value.\n@param value the value";
        let repair = repair_params(doc, &["value", "index"]).unwrap();
        assert_eq!(repair.fixes, vec![TagFix::Inserted("index".into())]);
        assert_eq!(
            repair.text,
            "Adds a value.\n@param value the value\n@param index TODO document"
        );
    }

    #[test]
    fn missing_tags_appended_when_doc_has_none() {
        let doc = "Runs the job.";
        let repair = repair_params(doc, &["timeout"]).unwrap();
        assert_eq!(repair.text, "Runs the job.\n@param timeout TODO document");
    }

    #[test]
    fn misspelled_tag_renamed() {
        let doc = "@param conut the number";
        let repair = repair_params(doc, &["count"]).unwrap();
        assert_eq!(
            repair.fixes,
            vec![TagFix::Renamed {
                from: "conut".into(),
                to: "count".into()
            }]
        );
        assert_eq!(repair.text, "@param count the number");
    }

    #[test]
    fn far_off_name_is_not_renamed() {
        // Distance 4 against a 5-char name exceeds the half-length bound,
        // and the unclaimed slot keeps the stray tag alive.
        let doc = "@param wrong the number";
        let repair = repair_params(doc, &["count"]).unwrap();
        assert!(repair
            .fixes
            .iter()
            .all(|f| !matches!(f, TagFix::Renamed { .. })));
        assert!(repair.fixes.contains(&TagFix::Inserted("count".into())));
        assert!(repair.text.contains("@param wrong the number"));
    }

    #[test]
    fn obsolete_tag_dropped_once_all_params_documented() {
        let doc = "@param value the value\n@param stale gone";
        let repair = repair_params(doc, &["value"]).unwrap();
        assert_eq!(repair.fixes, vec![TagFix::Dropped("stale".into())]);
        assert_eq!(repair.text, "@param value the value");
    }

    #[test]
    fn rename_of_a_keyword_substring_leaves_the_keyword_alone() {
        // "aram" also occurs inside "@param"; only the name token moves.
        let doc = "@param aram the value";
        let repair = repair_params(doc, &["arag"]).unwrap();
        assert_eq!(
            repair.fixes,
            vec![TagFix::Renamed {
                from: "aram".into(),
                to: "arag".into()
            }]
        );
        assert_eq!(repair.text, "@param arag the value");
    }

    #[test]
    fn rename_keeps_description_text() {
        let doc = "Header line.\n@param indx the index into the table";
        let repair = repair_params(doc, &["index"]).unwrap();
        assert_eq!(
            repair.text,
            "Header line.\n@param indx the index into the table"
                .replace("indx", "index")
        );
    }
}
