//! The shared fields for the new transaction form.

use maud::{Markup, html};
use time::Date;

use crate::{
    business_model::BusinessModel,
    category::Category,
    currency::Currency,
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, currency_select,
    },
    store::Store,
    transaction::TransactionKind,
};

pub struct TransactionFormDefaults {
    pub kind: TransactionKind,
    pub date: Date,
    pub max_date: Date,
}

/// Render the transaction form fields.
///
/// The kind radios reload the form via htmx so the category and business
/// model drop-downs only offer entries that fit the chosen kind.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults,
    categories: &[Category],
    stores: &[Store],
    models: &[BusinessModel],
) -> Markup {
    let is_expense = matches!(defaults.kind, TransactionKind::Expense);

    let kind_radio = |kind: TransactionKind, checked: bool| {
        let reload_url = format!("{}?kind={}", endpoints::NEW_TRANSACTION_VIEW, kind.as_str());
        let input_id = format!("transaction-kind-{}", kind.as_str());

        html! {
            div class="flex items-center gap-3"
            {
                input
                    name="kind"
                    id=(input_id)
                    type="radio"
                    value=(kind.as_str())
                    checked[checked]
                    required
                    tabindex="0"
                    hx-get=(reload_url)
                    hx-target="#transaction-form"
                    hx-select="#transaction-form"
                    hx-swap="outerHTML"
                    class=(FORM_RADIO_INPUT_STYLE);

                label
                    for=(input_id)
                    class=(FORM_RADIO_LABEL_STYLE)
                {
                    (kind.label())
                }
            }
        }
    };

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (kind_radio(TransactionKind::Expense, is_expense))
                (kind_radio(TransactionKind::Income, !is_expense))
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                placeholder="0.01"
                min="0.01"
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (currency_select(Currency::Usd))

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            select
                name="category"
                id="category"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a category" }

                @for category in categories {
                    option value=(category.name) { (category.name) }
                }
            }
        }

        div
        {
            label
                for="store_id"
                class=(FORM_LABEL_STYLE)
            {
                "Store"
            }

            select
                name="store_id"
                id="store_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No store" }

                @for store in stores {
                    option value=(store.id) { (store.name) }
                }
            }
        }

        div
        {
            label
                for="business_model_id"
                class=(FORM_LABEL_STYLE)
            {
                "Business Model"
            }

            select
                name="business_model_id"
                id="business_model_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "No business model" }

                @for model in models {
                    option value=(model.id) { (model.name) }
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
