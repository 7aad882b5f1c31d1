/// One `<count> <name>` line of a decklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecklistEntry {
    pub count: usize,
    pub name: String
}

impl DecklistEntry {
    pub fn new(count: usize, name: impl Into<String>) -> DecklistEntry {
        DecklistEntry { count, name: name.into() }
    }
}

/// Maindeck of a plain text decklist.
///
/// Entry order matters: a card position is resolved by walking the
/// cumulative counts in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decklist {
    entries: Vec<DecklistEntry>,
    total_count: usize
}

impl Decklist {
    /// Parse decklist text, one `<count> <name...>` per line.
    ///
    /// The first line which doesn't start with a count ends the maindeck.
    /// Deck hosts put a blank line or a `Sideboard` header there, so
    /// everything after it is ignored.
    pub fn parse(text: &str) -> Decklist {
        let mut decklist = Decklist::default();
        for line in text.lines() {
            let (count_token, rest) = split_count(line);
            let count = match count_token.parse::<usize>() {
                Ok(count) => count,
                Err(_) => break
            };
            let name = rest.trim();
            if name.is_empty() {
                trace!("Line {:?} has a count but no card, treat it as the end of maindeck.", line);
                break;
            }
            if count == 0 { continue; }
            if !decklist.push(DecklistEntry::new(count, name)) {
                warn!("Line {:?} overflows the card count, treat it as the end of maindeck.", line);
                break;
            }
        }
        decklist
    }

    // False, and nothing added, when the total would overflow.
    fn push(&mut self, entry: DecklistEntry) -> bool {
        match self.total_count.checked_add(entry.count) {
            Some(total_count) => {
                self.total_count = total_count;
                self.entries.push(entry);
                true
            },
            None => false
        }
    }

    pub fn entries(&self) -> &[DecklistEntry] {
        &self.entries
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// A constructed deck should hold at least `minimum` cards.
    pub fn is_plausible(&self, minimum: usize) -> bool {
        self.total_count >= minimum
    }
}

impl From<Vec<DecklistEntry>> for Decklist {
    fn from(entries: Vec<DecklistEntry>) -> Self {
        let mut decklist = Decklist::default();
        for entry in entries.into_iter().filter(|entry| entry.count > 0) {
            if !decklist.push(entry) { break; }
        }
        decklist
    }
}

fn split_count(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.split_once(char::is_whitespace) {
        Some((count, rest)) => (count, rest),
        None => (line, "")
    }
}
