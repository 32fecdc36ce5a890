//! 科目表

use phf::phf_map;

/// 科目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    code: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
}

static SUBJECTS: phf::Map<&'static str, Subject> = phf_map! {
    "COM SCI" => Subject {
        code: "COM SCI",
        display_name: "Computer Science (COM SCI)",
        aliases: &["COMPSCI", "COMSCI", "CS"],
    },
    "MATH" => Subject {
        code: "MATH",
        display_name: "Mathematics (MATH)",
        aliases: &[],
    },
    "EC ENGR" => Subject {
        code: "EC ENGR",
        display_name: "Electrical and Computer Engineering (EC ENGR)",
        aliases: &["ECE"],
    },
    "PHYSICS" => Subject {
        code: "PHYSICS",
        display_name: "Physics (PHYSICS)",
        aliases: &["PHYS"],
    },
    "STATS" => Subject {
        code: "STATS",
        display_name: "Statistics (STATS)",
        aliases: &["STAT"],
    },
};

impl Subject {
    /// 按科目代码查找（忽略大小写与多余空白）
    pub fn from_code(code: &str) -> Option<Self> {
        let key = code.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        SUBJECTS.get(key.as_str()).copied()
    }

    /// 默认科目：计算机科学
    pub fn computer_science() -> Self {
        SUBJECTS["COM SCI"]
    }

    /// 科目代码，同时是课程输入里要去掉的前缀
    pub fn code(self) -> &'static str {
        self.code
    }

    /// 检索页使用的科目全称
    pub fn display_name(self) -> &'static str {
        self.display_name
    }

    /// 输入里常见的简写，长的在前
    pub fn aliases(self) -> &'static [&'static str] {
        self.aliases
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::computer_science()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_normalizes_input() {
        assert_eq!(Subject::from_code("com  sci"), Some(Subject::computer_science()));
        assert_eq!(Subject::from_code(" math ").map(Subject::code), Some("MATH"));
        assert_eq!(Subject::from_code("HIST"), None);
    }

    #[test]
    fn test_default_subject_is_computer_science() {
        let subject = Subject::default();
        assert_eq!(subject.code(), "COM SCI");
        assert_eq!(subject.display_name(), "Computer Science (COM SCI)");
        assert!(subject.aliases().contains(&"CS"));
    }
}
