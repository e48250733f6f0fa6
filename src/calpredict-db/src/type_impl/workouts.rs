use calpredict_entities::workouts;
use calpredict_migration::OnConflict;
use calpredict_types::WorkoutRecord;
use sea_orm::{EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{DatabaseHandler, StoreError};

impl DatabaseHandler {
    pub async fn create_workout(&self, workout: WorkoutRecord) -> anyhow::Result<()> {
        let model = workouts::ActiveModel {
            id: Set(Uuid::new_v4()),
            activity: Set(workout.activity),
            start: Set(workout.start),
            end: Set(workout.end),
        };

        workouts::Entity::insert(model)
            .on_conflict(
                OnConflict::column(workouts::Column::Start)
                    .update_column(workouts::Column::End)
                    .update_column(workouts::Column::Activity)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn get_latest_workout(&self) -> Result<Option<WorkoutRecord>, StoreError> {
        Ok(workouts::Entity::find()
            .order_by_desc(workouts::Column::End)
            .one(&self.db)
            .await?
            .map(map_workout))
    }
}

fn map_workout(value: workouts::Model) -> WorkoutRecord {
    WorkoutRecord {
        activity: value.activity,
        start: value.start,
        end: value.end,
    }
}
