use std::collections::{HashMap, HashSet};

use crate::api::{Comment, CommentId, NestedComment};

/// A root comment with its direct replies: the two-level shape the UI
/// renders. The type itself rules out deeper nesting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentThread {
    pub root: Comment,
    pub replies: Vec<Comment>,
}

/// Rebuilds the display hierarchy from a flat, arbitrarily ordered comment
/// list. Roots keep input order, and so does each root's reply list; the
/// input order is what the server returned, i.e. creation order.
///
/// Every input comment ends up exactly once in the output. A comment whose
/// parent is missing from the input, references itself, or sits on a parent
/// cycle becomes a root rather than being dropped. Chains nested deeper than
/// one level are flattened into the nearest root's reply list.
pub fn build_threads(flat: Vec<Comment>) -> Vec<CommentThread> {
    let parents: HashMap<CommentId, Option<CommentId>> =
        flat.iter().map(|c| (c.id, c.parent_id)).collect();

    let mut threads = Vec::new();
    let mut slot = HashMap::new();
    let mut replies = Vec::new();
    // Roots first, so every reply has a thread to land in whatever the input order
    for c in flat {
        let root = root_of(c.id, &parents);
        if root == c.id {
            slot.insert(c.id, threads.len());
            threads.push(CommentThread {
                root: c,
                replies: Vec::new(),
            });
        } else {
            replies.push((root, c));
        }
    }
    for (root, c) in replies {
        match slot.get(&root) {
            Some(i) => threads[*i].replies.push(c),
            // root_of only returns ids present in the input, so this arm
            // should stay dead; degrade to a root instead of losing data
            None => {
                slot.insert(c.id, threads.len());
                threads.push(CommentThread {
                    root: c,
                    replies: Vec::new(),
                });
            }
        }
    }
    threads
}

/// Walks parent links from `start` up to the nearest root. Returns `start`
/// itself when it is a root, when its parent is orphaned or self-referential,
/// or when the chain loops; source data cannot guarantee acyclicity.
fn root_of(start: CommentId, parents: &HashMap<CommentId, Option<CommentId>>) -> CommentId {
    let mut seen = HashSet::new();
    seen.insert(start);
    let mut cur = start;
    loop {
        let parent = match parents.get(&cur) {
            Some(p) => *p,
            None => return cur,
        };
        match parent {
            None => return cur,
            Some(p) if p == cur => return cur,
            Some(p) if !parents.contains_key(&p) => {
                // Usually means the backend deleted a parent without
                // cascading to its children; keep the orphan visible but
                // leave a trace.
                tracing::warn!(comment = ?cur, parent = ?p, "comment parent is not in the result set");
                return cur;
            }
            Some(p) => {
                if !seen.insert(p) {
                    tracing::warn!(comment = ?start, "comment parent chain loops back on itself");
                    return start;
                }
                cur = p;
            }
        }
    }
}

/// Pass-through path for feeds the server already nested (lecture content):
/// each top-level entry becomes a root, and all its transitive descendants
/// are flattened depth-first into its reply list.
pub fn flatten_nested(nested: Vec<NestedComment>) -> Vec<CommentThread> {
    nested
        .into_iter()
        .map(|n| {
            let mut replies = Vec::new();
            for child in n.replies {
                collect_replies(child, &mut replies);
            }
            CommentThread {
                root: n.comment,
                replies,
            }
        })
        .collect()
}

fn collect_replies(n: NestedComment, out: &mut Vec<Comment>) {
    out.push(n.comment);
    for child in n.replies {
        collect_replies(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Author, ContentId, Uuid, UserId};

    fn comment(id: u128, parent: Option<u128>) -> Comment {
        let date = chrono::Utc::now();
        Comment {
            id: CommentId(Uuid::from_u128(id)),
            content_id: ContentId::stub(),
            parent_id: parent.map(|p| CommentId(Uuid::from_u128(p))),
            author: Author {
                id: UserId::stub(),
                name: String::from("alice"),
                avatar: None,
            },
            text: format!("comment {id}"),
            created_at: date,
            updated_at: date,
        }
    }

    fn id(n: u128) -> CommentId {
        CommentId(Uuid::from_u128(n))
    }

    fn ids(threads: &[CommentThread]) -> Vec<(CommentId, Vec<CommentId>)> {
        threads
            .iter()
            .map(|t| (t.root.id, t.replies.iter().map(|r| r.id).collect()))
            .collect()
    }

    #[test]
    fn empty_input_empty_output() {
        assert_eq!(build_threads(Vec::new()), Vec::new());
    }

    #[test]
    fn reply_attaches_to_its_root() {
        let threads = build_threads(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
        ]);
        assert_eq!(ids(&threads), vec![(id(1), vec![id(2)]), (id(3), vec![])]);
    }

    #[test]
    fn input_order_is_preserved() {
        let threads = build_threads(vec![
            comment(3, None),
            comment(4, Some(1)),
            comment(1, None),
            comment(2, Some(1)),
        ]);
        assert_eq!(
            ids(&threads),
            vec![(id(3), vec![]), (id(1), vec![id(4), id(2)])],
        );
    }

    #[test]
    fn orphaned_parent_becomes_root() {
        let threads = build_threads(vec![comment(1, Some(99)), comment(2, None)]);
        assert_eq!(ids(&threads), vec![(id(1), vec![]), (id(2), vec![])]);
    }

    #[test]
    fn self_referential_comment_becomes_root() {
        let threads = build_threads(vec![comment(1, Some(1)), comment(2, Some(1))]);
        assert_eq!(ids(&threads), vec![(id(1), vec![id(2)])]);
    }

    #[test]
    fn parent_cycle_does_not_hang_or_drop() {
        let threads = build_threads(vec![comment(1, Some(2)), comment(2, Some(1))]);
        assert_eq!(ids(&threads), vec![(id(1), vec![]), (id(2), vec![])]);
    }

    #[test]
    fn deep_chains_flatten_into_the_root() {
        let threads = build_threads(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
        ]);
        assert_eq!(ids(&threads), vec![(id(1), vec![id(2), id(3), id(4)])]);
    }

    #[test]
    fn every_comment_appears_exactly_once() {
        let input = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(7)),
            comment(4, Some(4)),
            comment(5, Some(2)),
            comment(6, None),
        ];
        let mut expected: Vec<_> = input.iter().map(|c| c.id).collect();
        let threads = build_threads(input);
        let mut seen: Vec<_> = threads
            .iter()
            .flat_map(|t| std::iter::once(t.root.id).chain(t.replies.iter().map(|r| r.id)))
            .collect();
        expected.sort();
        seen.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn nested_feed_passes_through_flattened() {
        let nested = vec![NestedComment {
            comment: comment(1, None),
            replies: vec![NestedComment {
                comment: comment(2, Some(1)),
                replies: vec![NestedComment {
                    comment: comment(3, Some(2)),
                    replies: Vec::new(),
                }],
            }],
        }];
        let threads = flatten_nested(nested);
        assert_eq!(ids(&threads), vec![(id(1), vec![id(2), id(3)])]);
    }
}
