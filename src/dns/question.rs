use serde::{Deserialize, Serialize};

use super::enums::{DNSResourceClass, DNSResourceType};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DNSQuestion {
    pub labels: Vec<String>,
    pub qtype: DNSResourceType,
    pub qclass: DNSResourceClass,
}

impl DNSQuestion {
    pub fn new(name: &str, qtype: DNSResourceType, qclass: DNSResourceClass) -> Self {
        DNSQuestion {
            labels: labels_from_name(name),
            qtype,
            qclass,
        }
    }

    /// Dotted presentation of the question name. A fully qualified name
    /// keeps its trailing dot.
    pub fn name(&self) -> String {
        name_from_labels(&self.labels)
    }
}

/// Parses a presentation-format name into labels.
///
/// A fully qualified name ends in the empty root label, so `"."` is `[""]`
/// and `"example.com."` is `["example", "com", ""]`. A `.` or `\` inside a
/// label is written as `\.` or `\\`; any other escaped character stands for
/// itself. The empty string has no labels at all.
pub fn labels_from_name(name: &str) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }
    if name == "." {
        return vec![String::new()];
    }

    let mut labels = Vec::new();
    let mut label = String::new();
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => label.push(chars.next().unwrap_or('\\')),
            '.' => labels.push(std::mem::take(&mut label)),
            _ => label.push(c),
        }
    }
    labels.push(label);
    labels
}

/// Inverse of [`labels_from_name`] for any label list a wire name can
/// produce, that is one with at most a single, trailing, empty label.
pub fn name_from_labels(labels: &[String]) -> String {
    if matches!(labels, [root] if root.is_empty()) {
        return ".".to_string();
    }

    let mut name = String::new();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            name.push('.');
        }
        for c in label.chars() {
            if c == '.' || c == '\\' {
                name.push('\\');
            }
            name.push(c);
        }
    }
    name
}
