//! Profile form session: the dynamic form fetched from the portal, filled
//! through a `FormController`, with its submission carried out against the API.

use std::sync::Arc;

use forms::{Effect, FormController, FormDefinition, FormPhase, Intent, Validator};
use tracing::info;

use crate::api::PortalApi;
use crate::error::ClientError;
use crate::notify::{Notification, Notifier};

pub struct ProfileSession {
    api: Arc<dyn PortalApi>,
    notifier: Arc<dyn Notifier>,
    controller: FormController,
}

impl ProfileSession {
    /// Fetch the current profile form and start filling it.
    pub async fn open(
        api: Arc<dyn PortalApi>,
        notifier: Arc<dyn Notifier>,
        validator: Validator,
    ) -> Result<Self, ClientError> {
        let form = api.profile_form().await?;
        Self::with_form(api, notifier, form, validator)
    }

    pub fn with_form(
        api: Arc<dyn PortalApi>,
        notifier: Arc<dyn Notifier>,
        form: FormDefinition,
        validator: Validator,
    ) -> Result<Self, ClientError> {
        let controller = FormController::new(form)?.with_validator(validator);
        Ok(Self {
            api,
            notifier,
            controller,
        })
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Apply an intent and carry out the effects it produced. A failed
    /// submission is fed back as `SubmissionFailed`, keeping the answers.
    pub async fn dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        let effects = self.controller.reduce(intent);
        for effect in &effects {
            let Effect::Submit(answers) = effect else {
                continue;
            };
            match self.api.submit_profile(answers).await {
                Ok(message) => {
                    let text = if message.is_empty() {
                        match self.controller.phase() {
                            FormPhase::Submitted { confirmation } => confirmation.clone(),
                            FormPhase::Filling(_) => String::from("Profile submitted"),
                        }
                    } else {
                        message
                    };
                    info!(answers = answers.len(), "profile response submitted");
                    self.notifier.notify(Notification::success(text));
                }
                Err(e) => {
                    self.notifier.notify(Notification::error(e.to_string()));
                    self.controller.submission_failed(e.to_string());
                }
            }
        }
        effects
    }
}
