/// Asserts that every expected fragment appears in `content`, in the given order.
///
/// Each fragment is searched for after the end of the previous match, so repeated fragments must appear
/// repeatedly.
#[macro_export]
macro_rules! assert_contains_inorder {
    ($content:expr, $expected:expr) => {{
        let content: &str = &$content;
        let mut remaining: &str = content;
        for expected in $expected.iter() {
            let expected: &str = expected;
            match remaining.find(expected) {
                Some(index) => remaining = &remaining[index + expected.len()..],
                None => panic!(
                    "content does not contain expected fragment, in order. expected: {:?}, content: {:?}",
                    expected, content
                ),
            }
        }
    }};
}
