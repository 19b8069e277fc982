use clap::{ArgGroup, Args, Subcommand};
use printshop::{
    cart::{AddToCart, CartAction, CartItem},
    customization::Customization,
};
use printshop_app::context::AppContext;
use tabled::builder::Builder;

use crate::cli::{
    selection::{self, SelectionArgs},
    table,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// List cart lines and totals
    Show,

    /// Add a product or a customized model
    Add(AddArgs),

    /// Remove a line
    Remove(RemoveArgs),

    /// Set a line's quantity; zero or less removes it
    Update(UpdateArgs),

    /// Remove every line
    Clear,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("target").required(true).args(["model", "product"])))]
pub(crate) struct AddArgs {
    /// Customizable model to add
    #[arg(long)]
    model: Option<String>,

    /// Regular product to add
    #[arg(long)]
    product: Option<String>,

    /// Variant of the product or model
    #[arg(long)]
    variant: Option<String>,

    /// Quantity to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Text to print
    #[arg(long, requires = "model")]
    text: Option<String>,

    /// Artwork to print (URL or upload id)
    #[arg(long, requires = "model")]
    image: Option<String>,

    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Line id as shown by `cart show`
    line_id: String,
}

#[derive(Debug, Args)]
pub(crate) struct UpdateArgs {
    /// Line id as shown by `cart show`
    line_id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) async fn run(command: CartCommand, context: &mut AppContext) -> Result<(), String> {
    match command.command {
        CartSubcommand::Show => show(context),
        CartSubcommand::Add(args) => add(args, context).await,
        CartSubcommand::Remove(args) => {
            let key = line(context, &args.line_id)?.key.clone();
            context.state.dispatch(CartAction::RemoveFromCart(key));
            show(context)
        }
        CartSubcommand::Update(args) => {
            let key = line(context, &args.line_id)?.key.clone();
            context
                .state
                .dispatch(CartAction::UpdateQuantity(key, args.quantity));
            show(context)
        }
        CartSubcommand::Clear => {
            context.state.dispatch(CartAction::ClearCart);
            show(context)
        }
    }
}

async fn add(args: AddArgs, context: &mut AppContext) -> Result<(), String> {
    let payload = match (&args.model, &args.product) {
        (Some(model_id), _) => {
            let model = selection::model(context, model_id).await?;

            let mut selector =
                selection::selector(context, model.base_price, args.selection).await?;
            selector.set_text(args.text.clone());
            selector.set_image(args.image.clone());

            selector.add_to_cart(&model, args.variant.as_deref(), args.quantity)
        }
        (None, Some(product_id)) => {
            let products = context
                .catalog
                .list_products()
                .await
                .map_err(|error| format!("failed to load products: {error}"))?;

            let product = products
                .into_iter()
                .find(|product| &product.id == product_id)
                .ok_or_else(|| format!("no product with id {product_id}"))?;

            let mut payload = AddToCart::new(
                &product.id,
                &product.name,
                product.variant_price(args.variant.as_deref()),
            )
            .with_quantity(args.quantity);

            if let Some(variant) = &args.variant {
                payload = payload.with_variant(variant);
            }

            if let Some(image) = &product.image {
                payload = payload.with_image(image);
            }

            payload
        }
        (None, None) => return Err("either --model or --product is required".to_string()),
    };

    context.state.dispatch(CartAction::AddToCart(payload));

    if let Some(error) = context.state.cart.error() {
        return Err(error.to_string());
    }

    show(context)
}

fn line<'a>(context: &'a AppContext, line_id: &str) -> Result<&'a CartItem, String> {
    context
        .state
        .cart
        .find_by_line_id(line_id)
        .ok_or_else(|| format!("no cart line {line_id}"))
}

fn show(context: &AppContext) -> Result<(), String> {
    let cart = &context.state.cart;

    if cart.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Line",
        "Item",
        "Variant",
        "Customization",
        "Qty",
        "Unit",
        "Total",
    ]);

    for item in cart.items() {
        builder.push_record([
            item.key.line_id(),
            item.name.clone(),
            item.key.variant_id().unwrap_or("-").to_string(),
            item.customization()
                .map_or_else(|| "-".to_string(), describe_customization),
            item.quantity.to_string(),
            table::amount(item.price, context.currency)?,
            table::amount(item.line_total(), context.currency)?,
        ]);
    }

    println!("{}", table::render(builder, 4));

    let total = cart
        .formatted_total(context.currency)
        .map_err(|error| error.to_string())?;

    println!("{} items, total {total}", cart.total_quantity());

    Ok(())
}

fn describe_customization(customization: &Customization) -> String {
    let selection = &customization.selection;

    let mut parts = Vec::new();

    if let Some(placement) = selection.text_placement() {
        parts.push(match &customization.text {
            Some(text) => format!("text {placement}: {text:?}"),
            None => format!("text {placement}"),
        });
    }

    if let Some(placement) = selection.image_placement() {
        parts.push(match &customization.image {
            Some(image) => format!("image {placement}: {image}"),
            None => format!("image {placement}"),
        });
    }

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join("\n")
    }
}
