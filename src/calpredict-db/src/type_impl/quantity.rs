use calpredict_entities::quantity_samples;
use calpredict_migration::OnConflict;
use calpredict_types::{Quantity, QuantitySample, QuantityType};
use chrono::NaiveDateTime;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{DatabaseHandler, StoreError};

// SQLite limits to 999 SQL variables: 6 columns per row -> max 166 rows
const SAMPLE_BATCH: usize = 150;

#[derive(Default, Debug)]
pub struct SearchSamples {
    pub quantity_type: Option<QuantityType>,
    /// Inclusive lower bound on sample start.
    pub from: Option<NaiveDateTime>,
    /// Inclusive upper bound on sample start.
    pub to: Option<NaiveDateTime>,
}

impl SearchSamples {
    pub(crate) fn conditions(self) -> Condition {
        Condition::all()
            .add_option(
                self.quantity_type
                    .map(|t| quantity_samples::Column::QuantityType.eq(t.to_string())),
            )
            .add_option(self.from.map(|from| quantity_samples::Column::Start.gte(from)))
            .add_option(self.to.map(|to| quantity_samples::Column::Start.lte(to)))
    }
}

impl DatabaseHandler {
    pub async fn create_sample(&self, sample: QuantitySample) -> anyhow::Result<u64> {
        self.create_samples(vec![sample]).await
    }

    /// Inserts samples and returns how many rows were new. A sample identical
    /// to a stored one (type, span, value and unit) is skipped, so importing
    /// the same export twice stores nothing the second time.
    pub async fn create_samples(&self, samples: Vec<QuantitySample>) -> anyhow::Result<u64> {
        let models = samples
            .into_iter()
            .map(|s| quantity_samples::ActiveModel {
                id: Set(Uuid::new_v4()),
                quantity_type: Set(s.quantity_type.to_string()),
                value: Set(s.quantity.value),
                unit: Set(s.quantity.unit.to_string()),
                start: Set(s.start),
                end: Set(s.end),
            })
            .collect::<Vec<_>>();

        let mut stored = 0;
        for batch in models.chunks(SAMPLE_BATCH) {
            stored += quantity_samples::Entity::insert_many(batch.to_vec())
                .on_conflict(
                    OnConflict::columns([
                        quantity_samples::Column::QuantityType,
                        quantity_samples::Column::Start,
                        quantity_samples::Column::End,
                        quantity_samples::Column::Value,
                        quantity_samples::Column::Unit,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
        }

        Ok(stored)
    }

    pub async fn get_latest_sample(
        &self,
        quantity_type: QuantityType,
    ) -> Result<Option<QuantitySample>, StoreError> {
        quantity_samples::Entity::find()
            .filter(quantity_samples::Column::QuantityType.eq(quantity_type.to_string()))
            .order_by_desc(quantity_samples::Column::End)
            .one(&self.db)
            .await?
            .map(parse_sample)
            .transpose()
    }

    pub async fn search_samples(
        &self,
        options: SearchSamples,
    ) -> Result<Vec<QuantitySample>, StoreError> {
        quantity_samples::Entity::find()
            .filter(options.conditions())
            .order_by_asc(quantity_samples::Column::Start)
            .all(&self.db)
            .await?
            .into_iter()
            .map(parse_sample)
            .collect()
    }
}

fn parse_sample(model: quantity_samples::Model) -> Result<QuantitySample, StoreError> {
    let quantity_type = model.quantity_type.parse().map_err(|_| {
        StoreError::CorruptRow(format!("unknown quantity type `{}`", model.quantity_type))
    })?;
    let unit = model
        .unit
        .parse()
        .map_err(|_| StoreError::CorruptRow(format!("unknown unit `{}`", model.unit)))?;

    Ok(QuantitySample {
        quantity_type,
        quantity: Quantity::new(model.value, unit),
        start: model.start,
        end: model.end,
    })
}
