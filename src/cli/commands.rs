//! CLI command implementations
//!
//! Each command loads what it needs from the configured record files, runs
//! one operation and returns the response payload. Nothing is kept between
//! invocations.

use serde_json::{json, Value};

use crate::account::{Account, Bank};
use crate::book::{Book, BookError, BookFormatter, BookListService};
use crate::config::Config;
use crate::observability::init_logging;
use crate::storage::{Record, RecordStore};

use super::args::{AccountAction, BookAction, Cli, Command, InspectTarget, SortKey};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments, run the command and print one JSON response.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let result = Config::load_or_default(cli.config.as_deref())
        .map_err(CliError::from)
        .and_then(|config| {
            init_logging(&config.log_level);
            run_command(cli.command, &config)
        });

    match result {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<Value> {
    match cmd {
        Command::Account { action } => account(action, config),
        Command::Book { action } => book(action, config),
        Command::Inspect { target } => inspect(target, config),
    }
}

fn open_bank(config: &Config) -> CliResult<Bank<RecordStore<Account>>> {
    let store = RecordStore::open(config.accounts_path())?.with_sync(config.sync_writes);
    Ok(Bank::with_rules(store, config.bank_rules()))
}

fn open_catalogue(config: &Config) -> CliResult<BookListService<RecordStore<Book>>> {
    let store = RecordStore::open(config.books_path())?.with_sync(config.sync_writes);
    Ok(BookListService::open(store)?)
}

/// Account subcommands
pub fn account(action: AccountAction, config: &Config) -> CliResult<Value> {
    let mut bank = open_bank(config)?;

    let data = match action {
        AccountAction::Open { holder, balance } => {
            let iban = bank.open_account(&holder, balance)?;
            json!({ "iban": iban, "account": bank.account(&iban)? })
        }
        AccountAction::Deposit { iban, amount } => {
            let balance = bank.deposit(&iban, amount)?;
            json!({ "iban": iban, "balance": balance })
        }
        AccountAction::Withdraw { iban, amount } => {
            let balance = bank.withdraw(&iban, amount)?;
            json!({ "iban": iban, "balance": balance })
        }
        AccountAction::Close { iban } => {
            let balance = bank.close_account(&iban)?;
            json!({ "iban": iban, "final_balance": balance })
        }
        AccountAction::Show { iban } => {
            let account = bank.account(&iban)?;
            json!({
                "account": account,
                "text": account.describe(&config.display_options()),
            })
        }
    };
    Ok(data)
}

/// Book subcommands
pub fn book(action: BookAction, config: &Config) -> CliResult<Value> {
    let mut catalogue = open_catalogue(config)?;
    let options = config.display_options();

    let data = match action {
        BookAction::Add {
            isbn,
            author,
            title,
            publisher,
            published,
            pages,
            price,
        } => {
            let published = published
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| BookError::validation("invalid publication date"))?;
            let book = Book::new(isbn, author, title, publisher, published, pages, price)?;
            let text = book.general(&options);
            catalogue.add_book(book)?;
            catalogue.save()?;
            json!({ "count": catalogue.len(), "text": text })
        }
        BookAction::Remove { isbn } => {
            let removed = catalogue.remove_book(&isbn)?;
            catalogue.save()?;
            json!({ "removed": removed, "count": catalogue.len() })
        }
        BookAction::Show {
            isbn,
            format,
            fields,
        } => {
            let book = catalogue
                .find_book(|b| b.isbn() == isbn)
                .ok_or_else(|| BookError::NotFound(isbn.clone()))?;
            let text = match fields {
                Some(fields) => book.format_fields(Some(&fields), &options)?,
                None => BookFormatter::new(options.clone()).format(book, format.as_deref())?,
            };
            json!({ "book": book, "text": text })
        }
        BookAction::List { sort, save } => {
            sort_catalogue(&mut catalogue, sort);
            if save {
                catalogue.save()?;
            }
            let books: Vec<Value> = catalogue
                .books()
                .iter()
                .map(|b| json!({ "isbn": b.isbn(), "text": b.general(&options) }))
                .collect();
            json!({ "count": books.len(), "books": books })
        }
    };
    Ok(data)
}

fn sort_catalogue(catalogue: &mut BookListService<RecordStore<Book>>, key: SortKey) {
    match key {
        SortKey::Author => catalogue.sort_books(),
        SortKey::Title => catalogue.sort_books_by(|a, b| a.title().cmp(b.title())),
        SortKey::Pages => catalogue.sort_books_by(|a, b| a.pages().cmp(&b.pages())),
        SortKey::Price => catalogue.sort_books_by(|a, b| a.price().cmp(&b.price())),
        SortKey::Published => catalogue.sort_books_by(|a, b| a.published().cmp(&b.published())),
        SortKey::File => {}
    }
}

/// Byte layout of a record file: offset, width and key of every record.
pub fn inspect(target: InspectTarget, config: &Config) -> CliResult<Value> {
    match target {
        InspectTarget::Accounts => layout::<Account>(RecordStore::open(config.accounts_path())?),
        InspectTarget::Books => layout::<Book>(RecordStore::open(config.books_path())?),
    }
}

fn layout<T: Record>(store: RecordStore<T>) -> CliResult<Value> {
    let entries: Vec<Value> = store
        .entries()?
        .into_iter()
        .map(|e| {
            json!({
                "offset": e.offset,
                "len": e.len,
                "key": e.record.key(),
                "mutable_offset": e.offset + e.record.mutable_offset() as u64,
            })
        })
        .collect();

    Ok(json!({
        "kind": T::KIND,
        "path": store.path().display().to_string(),
        "file_len": store.file_len()?,
        "records": entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        Config {
            data_dir: dir.path().to_path_buf(),
            sync_writes: false,
            ..Config::default()
        }
    }

    fn add_book(config: &Config, isbn: &str, author: &str, title: &str) -> Value {
        book(
            BookAction::Add {
                isbn: isbn.into(),
                author: author.into(),
                title: title.into(),
                publisher: "Microsoft Press".into(),
                published: NaiveDate::from_ymd_opt(2012, 1, 1).unwrap(),
                pages: 826,
                price: Decimal::new(5999, 2),
            },
            config,
        )
        .unwrap()
    }

    #[test]
    fn test_account_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        let opened = account(
            AccountAction::Open {
                holder: "Jane".into(),
                balance: Decimal::from(100),
            },
            &config,
        )
        .unwrap();
        let iban = opened["iban"].as_str().unwrap().to_string();
        assert_eq!(opened["account"]["tier"], "Standard");

        let deposited = account(
            AccountAction::Deposit {
                iban: iban.clone(),
                amount: Decimal::from(50),
            },
            &config,
        )
        .unwrap();
        assert_eq!(deposited["balance"], "150");

        let shown = account(AccountAction::Show { iban: iban.clone() }, &config).unwrap();
        assert!(shown["text"].as_str().unwrap().contains("Balance: $150.00"));

        let closed = account(AccountAction::Close { iban: iban.clone() }, &config).unwrap();
        assert_eq!(closed["final_balance"], "150");

        let err = account(AccountAction::Show { iban }, &config).unwrap_err();
        assert_eq!(err.code_str(), "LEDGER_STORE_NOT_FOUND");
    }

    #[test]
    fn test_book_commands() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);

        add_book(&config, "2", "Richter", "CLR via C#");
        let added = add_book(&config, "1", "Albahari", "C# in a Nutshell");
        assert_eq!(added["count"], 2);

        let listed = book(
            BookAction::List {
                sort: SortKey::Author,
                save: false,
            },
            &config,
        )
        .unwrap();
        assert_eq!(listed["books"][0]["isbn"], "1");

        let shown = book(
            BookAction::Show {
                isbn: "2".into(),
                format: None,
                fields: Some("AT".into()),
            },
            &config,
        )
        .unwrap();
        assert_eq!(shown["text"], "Richter, CLR via C#");

        let err = book(
            BookAction::Show {
                isbn: "2".into(),
                format: Some("X".into()),
                fields: None,
            },
            &config,
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "LEDGER_BOOK_FORMAT");

        let dup = book(
            BookAction::Add {
                isbn: "1".into(),
                author: "A".into(),
                title: "T".into(),
                publisher: "P".into(),
                published: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                pages: 1,
                price: Decimal::ONE,
            },
            &config,
        )
        .unwrap_err();
        assert_eq!(dup.code_str(), "LEDGER_BOOK_DUPLICATE_ISBN");

        book(BookAction::Remove { isbn: "2".into() }, &config).unwrap();
        let layout = inspect(InspectTarget::Books, &config).unwrap();
        assert_eq!(layout["records"].as_array().unwrap().len(), 1);
        assert_eq!(layout["records"][0]["offset"], 0);
    }

    #[test]
    fn test_inspect_accounts_layout() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        for holder in ["Ann", "Bob"] {
            account(
                AccountAction::Open {
                    holder: holder.into(),
                    balance: Decimal::from(60),
                },
                &config,
            )
            .unwrap();
        }

        let layout = inspect(InspectTarget::Accounts, &config).unwrap();
        let records = layout["records"].as_array().unwrap();
        assert_eq!(layout["kind"], "account");
        assert_eq!(records.len(), 2);
        let first_end = records[0]["offset"].as_u64().unwrap() + records[0]["len"].as_u64().unwrap();
        assert_eq!(records[1]["offset"].as_u64().unwrap(), first_end);
        assert_eq!(
            layout["file_len"].as_u64().unwrap(),
            first_end + records[1]["len"].as_u64().unwrap()
        );
    }
}
