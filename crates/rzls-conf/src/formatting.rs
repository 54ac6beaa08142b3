use serde::Deserialize;
use serde::Serialize;

/// How continuation lines of a multi-line start tag are indented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeIndentStyle {
    /// Align every attribute with the column of the first attribute.
    #[default]
    AlignWithFirst,
    /// Indent attributes one level deeper than the tag itself.
    IndentByOne,
}

/// Options every formatter receives; owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingOptions {
    pub tab_size: u32,
    pub insert_spaces: bool,
    pub code_block_brace_on_next_line: bool,
    pub attribute_indent_style: AttributeIndentStyle,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            tab_size: 4,
            insert_spaces: true,
            code_block_brace_on_next_line: false,
            attribute_indent_style: AttributeIndentStyle::AlignWithFirst,
        }
    }
}

impl FormattingOptions {
    /// One level of indentation.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size as usize)
        } else {
            "\t".to_string()
        }
    }

    /// Indentation string for `level` nesting levels.
    #[must_use]
    pub fn indent(&self, level: usize) -> String {
        self.indent_unit().repeat(level)
    }

    /// Indentation string spanning `columns` visual columns.
    ///
    /// With tabs enabled, whole tab stops become tabs and the remainder
    /// is padded with spaces.
    #[must_use]
    pub fn indent_columns(&self, columns: usize) -> String {
        if self.insert_spaces || self.tab_size == 0 {
            return " ".repeat(columns);
        }
        let tab = self.tab_size as usize;
        let mut indent = "\t".repeat(columns / tab);
        indent.push_str(&" ".repeat(columns % tab));
        indent
    }

    /// Visual width of a run of leading whitespace.
    #[must_use]
    pub fn columns_of(&self, whitespace: &str) -> usize {
        let tab = self.tab_size.max(1) as usize;
        whitespace.chars().fold(0, |columns, c| match c {
            '\t' => columns + tab - (columns % tab),
            _ => columns + 1,
        })
    }
}
