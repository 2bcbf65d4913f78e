//! Interactive shell over a `SplitStore`.
//!
//! Covers the overview stats, configuring a name, sending with a live
//! breakdown, and the payment history.

use std::io::{self, BufRead, Write};

use ensplit::split::resolver::within_tolerance;
use ensplit::types::format_date;
use ensplit::{SplitEntry, SplitStore};

/// Currency label shown next to amounts
const UNIT: &str = "ETH";

/// Suffix new names must carry when created from the shell
const NAME_SUFFIX: &str = ".eth";

const HELP: &str = "\
Commands:
  names                    - List configured names
  stats                    - Show session totals
  resolve <name>           - Show a name's split configuration
  records <name>           - Show a name's raw text records
  record <name> <key>      - Show one text record
  preview <name> <amount>  - Show how an amount would be split
  send <name> <amount>     - Pay a name
  configure <name>         - Set a name's recipients
  history                  - Show past payments
  help                     - Show this help
  quit                     - Exit";

/// Line-oriented shell
pub struct Shell<R, W> {
    store: SplitStore,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over a store
    pub fn new(store: SplitStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "ENSplit v{}", ensplit::VERSION)?;
        writeln!(self.output, "Dynamic payment splitting driven by name records")?;
        writeln!(self.output)?;
        writeln!(self.output, "{HELP}")?;
        writeln!(self.output)?;

        loop {
            let Some(line) = self.prompt("ensplit> ")? else {
                break;
            };

            let parts: Vec<&str> = line.split_whitespace().collect();
            let Some((&command, args)) = parts.split_first() else {
                continue;
            };

            match (command, args) {
                ("names", _) => self.names()?,
                ("stats", _) => self.stats()?,
                ("resolve", [name]) => self.resolve(name)?,
                ("records", [name]) => self.records(name)?,
                ("record", [name, key]) => self.record(name, key)?,
                ("preview", [name, amount]) => self.preview(name, amount)?,
                ("send", [name, amount]) => self.send(name, amount)?,
                ("configure", [name]) => self.configure(name)?,
                ("history", _) => self.history()?,
                ("help", _) => writeln!(self.output, "{HELP}")?,
                ("quit" | "exit" | "q", _) => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                ("resolve" | "records" | "record" | "preview" | "send" | "configure", _) => {
                    writeln!(self.output, "Wrong arguments for {command}. Type 'help' for usage.")?;
                }
                _ => writeln!(
                    self.output,
                    "Unknown command: {command}. Type 'help' for available commands."
                )?,
            }

            writeln!(self.output)?;
        }

        Ok(())
    }

    /// Print a prompt and read one line; `None` at end of input
    fn prompt(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn names(&mut self) -> io::Result<()> {
        let names: Vec<String> = self.store.list_names().into_iter().map(String::from).collect();
        if names.is_empty() {
            return writeln!(self.output, "No names configured.");
        }

        for name in names {
            match self.store.resolve(&name) {
                Ok(plan) => writeln!(self.output, "  {name} ({} recipients)", plan.entries.len())?,
                Err(e) => writeln!(self.output, "  {name} (invalid: {e})")?,
            }
        }
        Ok(())
    }

    fn stats(&mut self) -> io::Result<()> {
        let stats = self.store.stats();
        writeln!(self.output, "Total payments: {}", stats.total_payments)?;
        writeln!(self.output, "Total volume:   {} {UNIT}", stats.volume_display())?;
        writeln!(self.output, "Active names:   {}", stats.configured_names)?;
        writeln!(self.output, "Network:        simulated")
    }

    fn resolve(&mut self, name: &str) -> io::Result<()> {
        let plan = match self.store.resolve(name) {
            Ok(plan) => plan,
            Err(e) => return writeln!(self.output, "Error: {e}"),
        };

        writeln!(self.output, "{name} -> {}", plan.main_address)?;
        for entry in &plan.entries {
            writeln!(
                self.output,
                "  {:<16} {:<44} {:>6}%",
                entry.name, entry.address, entry.percent
            )?;
        }
        writeln!(self.output, "Total: {}%", plan.total_percent)
    }

    fn records(&mut self, name: &str) -> io::Result<()> {
        let records = match self.store.records(name) {
            Ok(records) => records,
            Err(e) => return writeln!(self.output, "Error: {e}"),
        };

        if records.is_empty() {
            return writeln!(self.output, "No records.");
        }
        writeln!(self.output, "{} records:", records.len())?;
        for (key, value) in records.iter() {
            writeln!(self.output, "  {key} = {value}")?;
        }
        Ok(())
    }

    fn record(&mut self, name: &str, key: &str) -> io::Result<()> {
        match self.store.text_record(name, key) {
            Ok(Some(value)) => writeln!(self.output, "{key} = {value}"),
            Ok(None) => writeln!(self.output, "{key} is not set"),
            Err(e) => writeln!(self.output, "Error: {e}"),
        }
    }

    fn preview(&mut self, name: &str, amount: &str) -> io::Result<()> {
        let payments = match self.store.preview(name, amount) {
            Ok(payments) => payments,
            Err(e) => return writeln!(self.output, "Error: {e}"),
        };

        writeln!(self.output, "Payment breakdown:")?;
        for p in &payments {
            writeln!(
                self.output,
                "  {:<16} {:<44} {:>12} {UNIT} ({}%)",
                p.name, p.address, p.amount, p.percent
            )?;
        }
        writeln!(self.output, "Total: {} {UNIT}", amount.trim())
    }

    fn send(&mut self, name: &str, amount: &str) -> io::Result<()> {
        writeln!(self.output, "Processing payment...")?;

        let payment = match self.store.compute_payment(name, amount) {
            Ok(payment) => payment,
            Err(e) => return writeln!(self.output, "Payment failed: {e}"),
        };

        writeln!(self.output, "Payment successful!")?;
        writeln!(self.output, "  Transaction hash: {}", payment.id)?;
        writeln!(self.output, "  Split across {} recipients", payment.recipient_count)?;
        for p in &payment.payments {
            writeln!(self.output, "    {}: {} {UNIT} ({}%)", p.name, p.amount, p.percent)?;
        }
        Ok(())
    }

    fn configure(&mut self, name: &str) -> io::Result<()> {
        if self.store.contains(name) {
            if let Ok(plan) = self.store.resolve(name) {
                writeln!(self.output, "Current recipients of {name}:")?;
                for entry in &plan.entries {
                    writeln!(self.output, "  {} {} {}", entry.name, entry.address, entry.percent)?;
                }
            }
        } else if !name.ends_with(NAME_SUFFIX) {
            return writeln!(
                self.output,
                "Please enter a valid name ending with {NAME_SUFFIX}"
            );
        }

        writeln!(
            self.output,
            "Enter recipients as '<name> <address> <percent>', empty line to finish:"
        )?;

        let mut entries = Vec::new();
        loop {
            let Some(line) = self.prompt("  recipient> ")? else {
                break;
            };
            if line.is_empty() {
                break;
            }

            match parse_recipient(&line) {
                Some(entry) => entries.push(entry),
                None => writeln!(self.output, "  Expected: <name> <address> <percent>")?,
            }
        }

        if entries.is_empty() {
            return writeln!(self.output, "No recipients entered; nothing saved.");
        }

        let total: f64 = entries.iter().map(|e| e.percent).sum();
        if !within_tolerance(total) {
            return writeln!(
                self.output,
                "Split percentages must total 100% (currently {total:.1}%)"
            );
        }

        match self.store.upsert(name, &entries) {
            Ok(()) => writeln!(self.output, "Configuration saved successfully for {name}!"),
            Err(e) => writeln!(self.output, "Error saving configuration: {e}"),
        }
    }

    fn history(&mut self) -> io::Result<()> {
        let rows: Vec<String> = self
            .store
            .history()
            .iter()
            .map(|tx| {
                format!(
                    "  {:<23} {:<22} {:>10} {UNIT} {:>3} recipients  {}  {}",
                    format!("{}...", tx.short_id()),
                    tx.source_name,
                    tx.amount,
                    tx.recipient_count,
                    format_date(tx.timestamp),
                    tx.status
                )
            })
            .collect();

        if rows.is_empty() {
            return writeln!(
                self.output,
                "No transactions yet. Send your first payment to get started!"
            );
        }
        for row in rows {
            writeln!(self.output, "{row}")?;
        }
        Ok(())
    }
}

/// Parse `<name> <address> <percent>`
fn parse_recipient(line: &str) -> Option<SplitEntry> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    let address = parts.next()?;
    let percent: f64 = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }
    Some(SplitEntry::new(name, address, percent))
}
