use lazy_static::lazy_static;

/// Label selected when a front-end starts up.
pub const DEFAULT_EXAMPLE: &str = "fact.wanda";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleEntry {
    pub label: &'static str,
    pub source: &'static str,
}

lazy_static! {
    static ref EXAMPLES: Vec<ExampleEntry> = vec![
        ExampleEntry {
            label: "fact.wanda",
            source: include_str!("../programs/fact.wanda"),
        },
        ExampleEntry {
            label: "arith.wanda",
            source: include_str!("../programs/arith.wanda"),
        },
        ExampleEntry {
            label: "square.wanda",
            source: include_str!("../programs/square.wanda"),
        },
        ExampleEntry {
            label: "stack.wanda",
            source: include_str!("../programs/stack.wanda"),
        },
        ExampleEntry {
            label: "countdown.wanda",
            source: include_str!("../programs/countdown.wanda"),
        },
    ];
}

/// The bundled example programs, in display order.
pub fn list_examples() -> &'static [ExampleEntry] {
    &EXAMPLES
}

pub fn find(label: &str) -> Option<&'static ExampleEntry> {
    list_examples().iter().find(|entry| entry.label == label)
}

/// Tracks which example is chosen and tells observers when that changes.
pub struct Selector<'a> {
    entries: &'a [ExampleEntry],
    selected: Option<usize>,
    observers: Vec<Box<dyn FnMut(&ExampleEntry) + 'a>>,
}

impl Default for Selector<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Selector<'a> {
    /// A selector over the bundled examples.
    pub fn new() -> Self {
        Self::over(list_examples())
    }

    pub fn over(entries: &'a [ExampleEntry]) -> Self {
        Self {
            entries,
            selected: None,
            observers: Vec::new(),
        }
    }

    pub fn entries(&self) -> &'a [ExampleEntry] {
        self.entries
    }

    /// Registers a callback run synchronously after every successful
    /// `select_by_label`.
    pub fn on_select(&mut self, observer: impl FnMut(&ExampleEntry) + 'a) {
        self.observers.push(Box::new(observer));
    }

    /// Selects the first entry labelled `label`. An unknown label leaves the
    /// selection alone, notifies nobody and returns `false`.
    pub fn select_by_label(&mut self, label: &str) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.label == label) else {
            return false;
        };
        self.selected = Some(index);
        let entries = self.entries;
        let entry = &entries[index];
        for observer in self.observers.iter_mut() {
            observer(entry);
        }
        true
    }

    pub fn current(&self) -> Option<&'a ExampleEntry> {
        self.selected.map(|index| &self.entries[index])
    }

    /// Source of the selected example, or `""` before anything is selected.
    pub fn current_source_text(&self) -> &'a str {
        self.current().map_or("", |entry| entry.source)
    }
}
