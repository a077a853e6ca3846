/// Parser hardening. The defaults accept everything the lenient grammar does.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Reject a block or list that reaches end of input without its closing
    /// `}` or `]`. When false the unterminated value simply ends there.
    pub strict_delimiters: bool,

    /// Maximum number of nested blocks and lists. Each level costs a frame of
    /// recursive descent, so this bounds stack usage.
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_delimiters: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            strict_delimiters: true,
            ..Self::default()
        }
    }
}
