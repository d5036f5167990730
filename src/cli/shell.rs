use std::io::{self, BufRead, IsTerminal, Write};

use rustyline::{error::ReadlineError, DefaultEditor};

use crate::{
    clock::SystemClock,
    config::Config,
    errors::CliError,
    storage::JsonFileStore,
    tracker::Tracker,
};

use super::commands::{self, ExpenseForm};
use super::output;

const MENU_TITLE: &str = "Personal Expense Tracker";
const MENU_ENTRIES: [&str; 4] = [
    "1. Add expense",
    "2. View all expenses",
    "3. Exit",
    "4. View by category",
];
const CHOICE_PROMPT: &str = "Choose an option: ";
const FAREWELL: &str = "Goodbye!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    ViewAll,
    Exit,
    ViewByCategory,
}

impl MenuChoice {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::ViewAll),
            "3" => Some(Self::Exit),
            "4" => Some(Self::ViewByCategory),
            _ => None,
        }
    }
}

/// Source of answered prompts. `None` means input is exhausted.
pub(crate) trait LineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError>;
}

struct ReadlineInput {
    editor: DefaultEditor,
}

impl ReadlineInput {
    fn new() -> Result<Self, CliError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineInput for ReadlineInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).ok();
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reads answers line by line from piped input, echoing each prompt.
pub(crate) struct ScriptInput<R> {
    reader: R,
}

impl<R: BufRead> ScriptInput<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineInput for ScriptInput<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CliError> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut buffer = String::new();
        if self.reader.read_line(&mut buffer)? == 0 {
            writeln!(stdout)?;
            return Ok(None);
        }
        let line = buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }
}

/// Session state: the single tracker the menu drives.
pub struct ShellContext {
    tracker: Tracker,
}

impl ShellContext {
    pub fn new(config: &Config) -> Self {
        let store = JsonFileStore::new(config.storage_path.clone());
        let (tracker, loaded) = Tracker::open(Box::new(store), Box::new(SystemClock));
        commands::report_load(loaded);
        Self::with_tracker(tracker)
    }

    pub fn with_tracker(tracker: Tracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub(crate) fn dispatch(
        &mut self,
        choice: &str,
        input: &mut dyn LineInput,
    ) -> Result<LoopControl, CliError> {
        let Some(choice) = MenuChoice::parse(choice) else {
            output::warning("Invalid option. Try again.");
            return Ok(LoopControl::Continue);
        };

        match choice {
            MenuChoice::Add => match collect_expense(input)? {
                Some(form) => commands::add_expense(&mut self.tracker, &form),
                None => return Ok(LoopControl::Exit),
            },
            MenuChoice::ViewAll => commands::view_all(&self.tracker),
            MenuChoice::Exit => return Ok(LoopControl::Exit),
            MenuChoice::ViewByCategory => match input.read_line("Enter category to filter: ")? {
                Some(category) => commands::view_by_category(&self.tracker, &category),
                None => return Ok(LoopControl::Exit),
            },
        }
        Ok(LoopControl::Continue)
    }
}

pub fn run_cli(config: Config) -> Result<(), CliError> {
    let mut context = ShellContext::new(&config);

    if io::stdin().is_terminal() {
        let mut input = ReadlineInput::new()?;
        run_menu(&mut context, &mut input)
    } else {
        let mut input = ScriptInput::new(io::stdin().lock());
        run_menu(&mut context, &mut input)
    }
}

pub(crate) fn run_menu(
    context: &mut ShellContext,
    input: &mut dyn LineInput,
) -> Result<(), CliError> {
    loop {
        print_menu();
        let control = match input.read_line(CHOICE_PROMPT)? {
            Some(choice) => context.dispatch(&choice, input)?,
            None => LoopControl::Exit,
        };
        if control == LoopControl::Exit {
            break;
        }
    }
    tracing::debug!(count = context.tracker().len(), "shell finished");
    output::info(FAREWELL);
    Ok(())
}

fn print_menu() {
    output::section(MENU_TITLE);
    for entry in MENU_ENTRIES {
        output::line(entry);
    }
}

/// Asks for the four expense fields. A blank date means "today".
fn collect_expense(input: &mut dyn LineInput) -> Result<Option<ExpenseForm>, CliError> {
    let Some(amount) = input.read_line("Enter amount: ")? else {
        return Ok(None);
    };
    let Some(category) = input.read_line("Enter category: ")? else {
        return Ok(None);
    };
    let Some(description) = input.read_line("Enter description: ")? else {
        return Ok(None);
    };
    let Some(date) = input.read_line("Enter date (YYYY-MM-DD) or leave blank: ")? else {
        return Ok(None);
    };
    let date = Some(date.trim().to_string()).filter(|value| !value.is_empty());
    Ok(Some(ExpenseForm {
        amount,
        category,
        description,
        date,
    }))
}
