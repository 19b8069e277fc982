use clap::Args;
use printshop_app::{
    api::Model,
    context::AppContext,
    pricing::{CustomizationSelector, PricingGridLoader, Toggle},
};
use rust_decimal::Decimal;

/// Placement flags shared by `pricing quote` and `cart add`.
#[derive(Debug, Clone, Copy, Default, Args)]
pub(crate) struct SelectionArgs {
    /// Print text on the front
    #[arg(long)]
    pub(crate) text_front: bool,

    /// Print text on the back
    #[arg(long)]
    pub(crate) text_back: bool,

    /// Print an image on the front
    #[arg(long)]
    pub(crate) image_front: bool,

    /// Print an image on the back
    #[arg(long)]
    pub(crate) image_back: bool,
}

impl SelectionArgs {
    fn apply(self, selector: &mut CustomizationSelector) {
        selector.set(Toggle::TextFront, self.text_front);
        selector.set(Toggle::TextBack, self.text_back);
        selector.set(Toggle::ImageFront, self.image_front);
        selector.set(Toggle::ImageBack, self.image_back);
    }
}

/// Loads the pricing grid and returns a selector for `base_price` with `args` applied.
pub(crate) async fn selector(
    context: &AppContext,
    base_price: Decimal,
    args: SelectionArgs,
) -> Result<CustomizationSelector, String> {
    let loader = PricingGridLoader::mount(context.pricing.clone());

    loader.load().await.map_err(|error| error.to_string())?;

    let mut selector = CustomizationSelector::new(loader.subscribe(), base_price);
    args.apply(&mut selector);

    Ok(selector)
}

pub(crate) async fn model(context: &AppContext, id: &str) -> Result<Model, String> {
    context
        .catalog
        .get_model(id)
        .await
        .map_err(|error| format!("failed to load model {id}: {error}"))
}
