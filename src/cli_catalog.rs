use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_prompt, get_styles, print_banner, print_empty_list, print_error, print_goodbye,
    print_help, print_key_value, print_section_footer, print_section_header, print_success,
    print_trend_line, print_warning, CommandHelp, TableBuilder,
};

use producthub_admin::admin::dashboard::{dashboard, shell, Trend};
use producthub_admin::admin::{Mutation, Notification, Notifier, ProductDetailView, ProductListView};
use producthub_admin::catalog_store::{format_effdate, format_price, EFFDATE_FORMAT};
use producthub_admin::SqliteProductStore;

use rustyline::{
    completion::Completer,
    highlight::Highlighter,
    history::FileHistory,
    validate::Validator,
    CompletionType, Config, Editor, Helper,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Path to the SQLite catalog database file, created if missing.
    #[clap(value_parser = parse_path)]
    pub path: PathBuf,
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "", disable_help_subcommand = true)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Reloads products from the database and shows them.
    List,

    /// Shows only products matching the query. Without a query, clears the filter.
    Filter { query: Option<String> },

    /// Opens a product together with its price history.
    View { prodcode: String },

    /// Adds a new product.
    Add {
        prodcode: String,
        description: String,
        unit: String,
    },

    /// Edits a product. The product code cannot change.
    Edit {
        prodcode: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        unit: Option<String>,
    },

    /// Asks for confirmation before deleting a product and its price history.
    Delete { prodcode: String },

    /// Adds a price entry to the open product.
    AddPrice { effdate: String, unitprice: String },

    /// Changes the unit price of an entry of the open product.
    EditPrice { effdate: String, unitprice: String },

    /// Asks for confirmation before deleting a price entry of the open product.
    DeletePrice { effdate: String },

    /// Carries out the pending delete.
    Confirm,

    /// Drops the pending delete.
    Cancel,

    /// Closes the open product.
    Close,

    /// Shows the dashboard overview.
    Dashboard,

    /// Shows the path of the current catalog db.
    Where,

    /// Shows the available commands.
    Help,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PRODUCT_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "list",
        args: "",
        description: "Reload and show all products",
    },
    CommandHelp {
        name: "filter",
        args: "[query]",
        description: "Filter products, no query clears the filter",
    },
    CommandHelp {
        name: "view",
        args: "<prodcode>",
        description: "Open a product and its price history",
    },
    CommandHelp {
        name: "add",
        args: "<prodcode> <description> <unit>",
        description: "Add a product",
    },
    CommandHelp {
        name: "edit",
        args: "<prodcode> [--description <d>] [--unit <u>]",
        description: "Edit a product",
    },
    CommandHelp {
        name: "delete",
        args: "<prodcode>",
        description: "Delete a product and its price history",
    },
];

const PRICE_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "add-price",
        args: "<YYYY-MM-DD> <price>",
        description: "Add a price entry to the open product",
    },
    CommandHelp {
        name: "edit-price",
        args: "<YYYY-MM-DD> <price>",
        description: "Change the price of an entry",
    },
    CommandHelp {
        name: "delete-price",
        args: "<YYYY-MM-DD>",
        description: "Delete a price entry",
    },
];

const DIALOG_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "confirm",
        args: "",
        description: "Carry out the pending delete",
    },
    CommandHelp {
        name: "cancel",
        args: "",
        description: "Drop the pending delete",
    },
    CommandHelp {
        name: "close",
        args: "",
        description: "Close the open product",
    },
];

const SYSTEM_COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "dashboard",
        args: "",
        description: "Show the dashboard overview",
    },
    CommandHelp {
        name: "where",
        args: "",
        description: "Show the catalog db path",
    },
    CommandHelp {
        name: "help",
        args: "",
        description: "Show this help",
    },
    CommandHelp {
        name: "exit",
        args: "",
        description: "Quit",
    },
];

fn show_help() {
    print_help(&[
        ("Products", PRODUCT_COMMANDS),
        ("Prices", PRICE_COMMANDS),
        ("Dialog", DIALOG_COMMANDS),
        ("System", SYSTEM_COMMANDS),
    ]);
}

/// Prints notifications as they arrive.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        let line = format!("{}: {}", notification.title, notification.description);
        if notification.is_error() {
            print_error(&line);
        } else {
            print_success(&line);
        }
    }
}

struct CatalogSession<N: Notifier> {
    store: SqliteProductStore,
    view: ProductListView,
    notifier: N,
    db_path: String,
}

impl<N: Notifier> CatalogSession<N> {
    fn open(store: SqliteProductStore, notifier: N, db_path: String) -> Self {
        let mut session = CatalogSession {
            store,
            view: ProductListView::new(),
            notifier,
            db_path,
        };
        session.reload();
        session
    }

    fn reload(&mut self) -> bool {
        self.view.load(&self.store, &mut self.notifier)
    }

    fn prompt_context(&self) -> Option<&str> {
        self.view.detail().map(|detail| detail.product().prodcode.as_str())
    }

    fn open_detail_mut(&mut self) -> Option<&mut ProductDetailView> {
        if self.view.detail().is_none() {
            print_warning("No product is open, use `view <prodcode>` first");
        }
        self.view.detail_mut()
    }
}

fn parse_effdate(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), EFFDATE_FORMAT)
        .map_err(|_| format!("Invalid effective date '{}', expected YYYY-MM-DD", value))
}

fn print_products(view: &ProductListView) {
    print_section_header("Products");
    if !view.query().is_empty() {
        print_key_value("Filter", view.query());
    }
    let rows = view.visible_rows();
    if rows.is_empty() {
        print_empty_list("No products found");
    } else {
        let mut table = TableBuilder::new(vec!["Code", "Description", "Unit", "Current Price"]);
        for row in rows {
            table.add_row(vec![
                row.prodcode.clone(),
                row.description.clone(),
                row.unit.clone(),
                row.display_price(),
            ]);
        }
        table.print();
    }
    print_section_footer();
}

fn print_detail(detail: &ProductDetailView) {
    print_section_header(ProductDetailView::TITLE);
    let product = detail.product();
    print_key_value("Code", &product.prodcode);
    print_key_value("Description", &product.description);
    print_key_value("Unit", &product.unit);
    if detail.history().is_empty() {
        print_empty_list("No price history");
    } else {
        let mut table = TableBuilder::new(vec!["Effective Date", "Unit Price"]);
        for entry in detail.history() {
            table.add_row(vec![
                format_effdate(&entry.effdate),
                format_price(&entry.unitprice),
            ]);
        }
        table.print();
    }
    print_section_footer();
}

fn print_dashboard() {
    let dashboard = dashboard();
    print_section_header(dashboard.title);
    for tile in &dashboard.stats {
        print_trend_line(
            tile.title,
            tile.value,
            tile.trend == Trend::Up,
            tile.trend_value,
        );
    }
    println!();
    let mut table = TableBuilder::new(vec!["Top Product", "Status", "Price"]);
    for card in &dashboard.top_products {
        table.add_row(vec![
            card.name.to_string(),
            card.status.label().to_string(),
            format_price(&card.price),
        ]);
    }
    table.print();
    println!();
    for entry in &dashboard.recent_activity {
        print_key_value(entry.user, &format!("{} ({})", entry.action, entry.time));
    }
    print_section_footer();
}

fn execute_command<N: Notifier>(
    line: String,
    session: &mut CatalogSession<N>,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let cli = match cli {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return CommandExecutionResult::Ok;
        }
    };

    match cli.command {
        InnerCommand::List => {
            session.reload();
            print_products(&session.view);
        }
        InnerCommand::Filter { query } => {
            session.view.set_query(query.unwrap_or_default());
            print_products(&session.view);
        }
        InnerCommand::View { prodcode } => {
            let CatalogSession {
                store,
                view,
                notifier,
                ..
            } = session;
            if !view.open_detail(store, &prodcode, notifier) {
                return CommandExecutionResult::Error(format!("Product {} not found", prodcode));
            }
            if let Some(detail) = view.detail() {
                print_detail(detail);
            }
        }
        InnerCommand::Add {
            prodcode,
            description,
            unit,
        } => {
            session.view.open_add_form();
            if let Some(form) = session.view.product_form_mut() {
                form.set_prodcode(prodcode);
                form.set_description(description);
                form.set_unit(unit);
            }
            submit_product_form(session);
        }
        InnerCommand::Edit {
            prodcode,
            description,
            unit,
        } => {
            if !session.view.open_edit_form(&prodcode) {
                return CommandExecutionResult::Error(format!("Product {} not found", prodcode));
            }
            if let Some(form) = session.view.product_form_mut() {
                if let Some(description) = description {
                    form.set_description(description);
                }
                if let Some(unit) = unit {
                    form.set_unit(unit);
                }
            }
            submit_product_form(session);
        }
        InnerCommand::Delete { prodcode } => {
            if session.view.row(&prodcode).is_none() {
                return CommandExecutionResult::Error(format!("Product {} not found", prodcode));
            }
            print_warning(&format!(
                "Delete product {} and its price history? Type `confirm` or `cancel`.",
                prodcode
            ));
            session.view.request_delete(prodcode);
        }
        InnerCommand::AddPrice { effdate, unitprice } => {
            let Some(detail) = session.open_detail_mut() else {
                return CommandExecutionResult::Ok;
            };
            detail.open_add_price();
            if let Some(form) = detail.price_form_mut() {
                form.set_effdate(effdate);
                form.set_unitprice(unitprice);
            }
            submit_price_form(session);
        }
        InnerCommand::EditPrice { effdate, unitprice } => {
            let date = match parse_effdate(&effdate) {
                Ok(date) => date,
                Err(err) => return CommandExecutionResult::Error(err),
            };
            let Some(detail) = session.open_detail_mut() else {
                return CommandExecutionResult::Ok;
            };
            if !detail.open_edit_price(date) {
                return CommandExecutionResult::Error(format!(
                    "No price entry effective {}",
                    format_effdate(&date)
                ));
            }
            if let Some(form) = detail.price_form_mut() {
                form.set_unitprice(unitprice);
            }
            submit_price_form(session);
        }
        InnerCommand::DeletePrice { effdate } => {
            let date = match parse_effdate(&effdate) {
                Ok(date) => date,
                Err(err) => return CommandExecutionResult::Error(err),
            };
            let Some(detail) = session.open_detail_mut() else {
                return CommandExecutionResult::Ok;
            };
            if !detail.history().iter().any(|entry| entry.effdate == date) {
                return CommandExecutionResult::Error(format!(
                    "No price entry effective {}",
                    format_effdate(&date)
                ));
            }
            detail.request_delete_price(date);
            print_warning(&format!(
                "Delete the price effective {}? Type `confirm` or `cancel`.",
                format_effdate(&date)
            ));
        }
        InnerCommand::Confirm => {
            let CatalogSession {
                store,
                view,
                notifier,
                ..
            } = session;
            if view.pending_delete().is_some() {
                if view.confirm_delete(store, notifier).is_applied() {
                    print_products(view);
                }
            } else if view.detail().and_then(|d| d.pending_delete()).is_some() {
                if view.confirm_price_delete(store, notifier).is_applied() {
                    if let Some(detail) = view.detail() {
                        print_detail(detail);
                    }
                }
            } else {
                print_warning("Nothing to confirm");
            }
        }
        InnerCommand::Cancel => {
            session.view.cancel_delete();
            if let Some(detail) = session.view.detail_mut() {
                detail.cancel_delete_price();
            }
        }
        InnerCommand::Close => {
            session.view.close_dialog();
        }
        InnerCommand::Dashboard => {
            print_dashboard();
        }
        InnerCommand::Where => {
            print_key_value("Catalog db", &session.db_path);
        }
        InnerCommand::Help => {
            show_help();
        }
        InnerCommand::Exit => {
            return CommandExecutionResult::Exit;
        }
    }
    CommandExecutionResult::Ok
}

fn submit_product_form<N: Notifier>(session: &mut CatalogSession<N>) {
    let CatalogSession {
        store,
        view,
        notifier,
        ..
    } = session;
    match view.submit_product_form(store, notifier) {
        Mutation::Applied => print_products(view),
        Mutation::Unchanged => view.close_dialog(),
    }
}

fn submit_price_form<N: Notifier>(session: &mut CatalogSession<N>) {
    let CatalogSession {
        store,
        view,
        notifier,
        ..
    } = session;
    let mutation = view.submit_price_form(store, notifier);
    if let Some(detail) = view.detail_mut() {
        match mutation {
            Mutation::Applied => print_detail(detail),
            Mutation::Unchanged => detail.close_price_form(),
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct CatalogHelper {
    commands_names: Vec<String>,
}

impl CatalogHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        CatalogHelper { commands_names }
    }
}

impl Completer for CatalogHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(" ") {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .map(|c| c.to_string())
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for CatalogHelper {}
impl Validator for CatalogHelper {}
impl Helper for CatalogHelper {}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize tracing")?;

    let store = SqliteProductStore::new(&cli_args.path)
        .with_context(|| format!("Could not open catalog db at {:?}", cli_args.path))?;

    print_banner();
    println!("  {}", shell().app_name);
    show_help();

    let mut session = CatalogSession::open(
        store,
        ConsoleNotifier,
        cli_args.path.display().to_string(),
    );
    print_products(&session.view);

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<CatalogHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(CatalogHelper::new()));

    loop {
        let prompt = get_prompt(session.prompt_context());
        let readline = rl.readline(&prompt);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut session) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    print_goodbye();
    Ok(())
}
