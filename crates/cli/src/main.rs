//! Kube EC terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! kube-ec products list --search teapot
//! kube-ec products show <PRODUCT_ID>
//!
//! # Shop
//! kube-ec products add <PRODUCT_ID> --quantity 2
//! kube-ec cart show
//! kube-ec cart inc <PRODUCT_ID>
//!
//! # Sign in and pay
//! KUBE_EC_PASSWORD=... kube-ec login --email you@example.com
//! KUBE_EC_PAYMENT_TOKEN=tok_visa kube-ec checkout submit \
//!     --postal-code 150-0001 --prefecture Tokyo --city Shibuya --line1 "1-2-3 Jingumae"
//!
//! # History
//! kube-ec orders list
//! ```
//!
//! The session and cart persist between runs in `STOREFRONT_DATA_DIR`.
//! Logs go to stderr (`RUST_LOG`, default `kube_ec=info`); pages go to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use kube_ec_core::{OrderId, PaymentMethod, ProductId};
use kube_ec_storefront::config::StorefrontConfig;
use kube_ec_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kube-ec")]
#[command(author, version, about = "Kube EC terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// View and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Review the cart and place the order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
    /// Sign in
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(long, env = "KUBE_EC_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "KUBE_EC_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password again; defaults to `--password`
        #[arg(long, env = "KUBE_EC_PASSWORD_CONFIRM", hide_env_values = true)]
        password_confirm: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign out on this device
    Logout,
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Profile management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Products per page (default: `STOREFRONT_PAGE_SIZE`)
        #[arg(long)]
        page_size: Option<u32>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show { id: ProductId },
    /// Add a product to the cart
    Add {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add a product to the cart and go to the cart (requires login)
    Buy {
        id: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a line
    Inc { id: ProductId },
    /// Remove one unit of a line
    Dec { id: ProductId },
    /// Set a line's quantity
    Set { id: ProductId, quantity: u32 },
    /// Remove a line
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
    /// Proceed to checkout
    Checkout,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Review the order before paying
    Show,
    /// Place the order and pay
    Submit {
        /// Postal code (123-4567)
        #[arg(long)]
        postal_code: String,

        #[arg(long)]
        prefecture: String,

        #[arg(long)]
        city: String,

        /// Street address
        #[arg(long)]
        line1: String,

        /// Building, room
        #[arg(long, default_value = "")]
        line2: String,

        /// Contact phone for delivery
        #[arg(long, default_value = "")]
        phone: String,

        /// `credit_card`, `bank_transfer` or `convenience_store`
        #[arg(long, default_value = "credit_card")]
        method: PaymentMethod,

        /// Token issued by the payment provider
        #[arg(long, env = "KUBE_EC_PAYMENT_TOKEN", hide_env_values = true)]
        payment_token: String,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show one order
    Show { id: OrderId },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Show your profile
    Show,
    /// Change name or phone number
    Update {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete your account
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kube_ec=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let mut state = AppState::new(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                page_size,
                category,
                search,
            } => commands::products::list(&state, page, page_size, category, search).await?,
            ProductsAction::Show { id } => commands::products::show(&state, &id).await?,
            ProductsAction::Add { id, quantity } => {
                commands::products::add(&mut state, &id, quantity).await?;
            }
            ProductsAction::Buy { id, quantity } => {
                commands::products::buy(&mut state, &id, quantity).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state)?,
            CartAction::Inc { id } => commands::cart::increment(&mut state, &id)?,
            CartAction::Dec { id } => commands::cart::decrement(&mut state, &id)?,
            CartAction::Set { id, quantity } => {
                commands::cart::set_quantity(&mut state, &id, quantity)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&mut state, &id)?,
            CartAction::Clear => commands::cart::clear(&mut state)?,
            CartAction::Checkout => commands::cart::checkout(&state)?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Show => commands::checkout::show(&state)?,
            CheckoutAction::Submit {
                postal_code,
                prefecture,
                city,
                line1,
                line2,
                phone,
                method,
                payment_token,
            } => {
                let address = commands::checkout::AddressArgs {
                    postal_code,
                    prefecture,
                    city,
                    line1,
                    line2,
                    phone,
                };
                commands::checkout::submit(&mut state, address, method, payment_token).await?;
            }
        },
        Commands::Login { email, password } => {
            commands::session::login(&mut state, email, password).await?;
        }
        Commands::Register {
            name,
            email,
            password,
            password_confirm,
            phone,
        } => {
            let confirm = password_confirm.unwrap_or_else(|| password.clone());
            commands::session::register(&mut state, name, email, password, confirm, phone)
                .await?;
        }
        Commands::Logout => commands::session::logout(&mut state)?,
        Commands::Orders { action } => match action {
            OrdersAction::List { page } => commands::orders::list(&state, page).await?,
            OrdersAction::Show { id } => commands::orders::show(&state, &id).await?,
        },
        Commands::Account { action } => match action {
            AccountAction::Show => commands::account::show(&state).await?,
            AccountAction::Update { name, phone } => {
                commands::account::update(&mut state, name, phone).await?;
            }
            AccountAction::Delete { yes } => commands::account::delete(&mut state, yes).await?,
        },
    }
    Ok(())
}
