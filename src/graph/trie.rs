//! Byte-wise prefix index over node names, used for autocomplete.
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    // Ordered by byte so walks come out in ascending byte order.
    children: BTreeMap<u8, usize>,
    word: Option<String>,
}

/// Arena-backed trie. Index 0 is the root.
#[derive(Debug, Clone)]
pub struct PrefixIndex {
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self { nodes: vec![TrieNode::default()], words: 0 }
    }
}

impl PrefixIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Index `word`. Returns `false` when it was already present.
    pub fn insert(&mut self, word: &str) -> bool {
        let mut cur = 0usize;
        for &b in word.as_bytes() {
            cur = match self.nodes[cur].children.get(&b) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur].children.insert(b, next);
                    next
                }
            };
        }
        let slot = &mut self.nodes[cur].word;
        if slot.is_some() {
            return false;
        }
        *slot = Some(word.to_string());
        self.words += 1;
        true
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.descend(word).is_some_and(|i| self.nodes[i].word.is_some())
    }

    /// Up to `limit` indexed words starting with `prefix`.
    ///
    /// Results follow a pre-order walk below the prefix node: a node's own word
    /// comes before its extensions, and siblings are visited in ascending byte
    /// order. The match is case-sensitive and byte-exact.
    #[must_use]
    pub fn search(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }
        let Some(start) = self.descend(prefix) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if let Some(word) = &node.word {
                out.push(word.clone());
                if out.len() >= limit {
                    break;
                }
            }
            // Reverse so the smallest byte is popped next.
            stack.extend(node.children.values().rev().copied());
        }
        out
    }

    fn descend(&self, prefix: &str) -> Option<usize> {
        prefix
            .as_bytes()
            .iter()
            .try_fold(0usize, |cur, b| self.nodes[cur].children.get(b).copied())
    }
}
