//! Built-in practice passages
//!
//! A small library of short, realistic code passages per [`Language`]. Hosts pick one
//! as the target text of a [`TypingSession`](crate::TypingSession).

use crate::language::{Language, LanguageFamily};

/// A practice passage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub title: &'static str,
    pub language: Language,
    pub code: &'static str,
}

impl Snippet {
    /// The lexical family to highlight this snippet with
    pub const fn family(&self) -> LanguageFamily {
        self.language.family()
    }
}

const SNIPPETS: &[Snippet] = &[
    Snippet {
        title: "Debounce",
        language: Language::JavaScript,
        code: r#"function debounce(fn, wait) {
  let timer = null;
  return function (...args) {
    clearTimeout(timer);
    timer = setTimeout(() => fn.apply(this, args), wait);
  };
}"#,
    },
    Snippet {
        title: "Fetch JSON",
        language: Language::JavaScript,
        code: r#"async function fetchJson(url) {
  const response = await fetch(url);
  if (!response.ok) {
    throw new Error(`Request failed: ${response.status}`);
  }
  return response.json();
}"#,
    },
    Snippet {
        title: "Typed Stack",
        language: Language::TypeScript,
        code: r#"class Stack<T> {
  private items: T[] = [];

  push(item: T): void {
    this.items.push(item);
  }

  pop(): T | undefined {
    return this.items.pop();
  }
}"#,
    },
    Snippet {
        title: "Binary Search",
        language: Language::Python,
        code: r#"def binary_search(items, target):
    low, high = 0, len(items) - 1
    while low <= high:
        mid = (low + high) // 2
        if items[mid] == target:
            return mid
        if items[mid] < target:
            low = mid + 1
        else:
            high = mid - 1
    return -1"#,
    },
    Snippet {
        title: "Word Count",
        language: Language::Python,
        code: r#"from collections import Counter

def word_count(text):
    # Lowercase so "The" and "the" count together
    words = text.lower().split()
    return Counter(words).most_common(10)"#,
    },
    Snippet {
        title: "Top Customers",
        language: Language::Sql,
        code: r#"SELECT c.name, SUM(o.total) AS revenue
FROM customers c
JOIN orders o ON o.customer_id = c.id
WHERE o.created_at >= '2024-01-01'
GROUP BY c.name
ORDER BY revenue DESC
LIMIT 10;"#,
    },
    Snippet {
        title: "Fizz Buzz",
        language: Language::Java,
        code: r#"for (int i = 1; i <= 100; i++) {
    if (i % 15 == 0) {
        System.out.println("FizzBuzz");
    } else if (i % 3 == 0) {
        System.out.println("Fizz");
    } else if (i % 5 == 0) {
        System.out.println("Buzz");
    } else {
        System.out.println(i);
    }
}"#,
    },
    Snippet {
        title: "String Length",
        language: Language::C,
        code: r#"/* Count bytes up to the terminating NUL */
size_t string_length(const char *s) {
    const char *p = s;
    while (*p != '\0') {
        p++;
    }
    return p - s;
}"#,
    },
    Snippet {
        title: "Vector Sum",
        language: Language::Cpp,
        code: r#"int sum(const std::vector<int>& values) {
    int total = 0;
    for (const auto& value : values) {
        total += value;
    }
    return total;
}"#,
    },
    Snippet {
        title: "Word Frequencies",
        language: Language::Rust,
        code: r#"fn frequencies(text: &str) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
}"#,
    },
    Snippet {
        title: "Worker Pool",
        language: Language::Go,
        code: r#"func worker(id int, jobs <-chan int, results chan<- int) {
	for job := range jobs {
		results <- job * 2
	}
}"#,
    },
    Snippet {
        title: "Login Form",
        language: Language::Html,
        code: r#"<form action="/login" method="post">
  <label for="user">Username</label>
  <input id="user" name="user" type="text">
  <button type="submit">Sign in</button>
</form>"#,
    },
    Snippet {
        title: "Maven Dependency",
        language: Language::Xml,
        code: r#"<dependency>
  <groupId>org.junit.jupiter</groupId>
  <artifactId>junit-jupiter</artifactId>
  <version>5.10.0</version>
  <scope>test</scope>
</dependency>"#,
    },
    Snippet {
        title: "Circle Icon",
        language: Language::Svg,
        code: r#"<svg width="24" height="24" viewBox="0 0 24 24">
  <circle cx="12" cy="12" r="10" fill="none" stroke="black"/>
</svg>"#,
    },
];

/// Every built-in snippet
pub fn all() -> &'static [Snippet] {
    SNIPPETS
}

/// The snippets written in `language`
pub fn by_language(language: Language) -> impl Iterator<Item = &'static Snippet> {
    SNIPPETS
        .iter()
        .filter(move |snippet| snippet.language == language)
}

/// Find a snippet by title, ignoring case
pub fn find(title: &str) -> Option<&'static Snippet> {
    let title = title.trim();
    SNIPPETS
        .iter()
        .find(|snippet| snippet.title.eq_ignore_ascii_case(title))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_library_is_well_formed() {
        let mut titles = HashSet::new();
        for snippet in all() {
            assert!(!snippet.code.trim().is_empty(), "{} is empty", snippet.title);
            assert!(titles.insert(snippet.title), "duplicate title {}", snippet.title);
        }
    }

    #[test]
    fn test_by_language() {
        let python: Vec<_> = by_language(Language::Python).collect();
        assert_eq!(python.len(), 2);
        assert!(python.iter().all(|snippet| snippet.language == Language::Python));
    }

    #[test]
    fn test_find_ignores_case() {
        let snippet = find("binary search").unwrap();
        assert_eq!(snippet.language, Language::Python);
        assert_eq!(find("  Login Form "), find("login form"));
        assert!(find("missing").is_none());
    }

    #[test]
    fn test_markup_snippets_use_markup_family() {
        assert_eq!(find("Login Form").unwrap().family(), LanguageFamily::Markup);
        assert_eq!(find("Debounce").unwrap().family(), LanguageFamily::CLike);
    }
}
