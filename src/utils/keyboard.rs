use crate::model::role::Role;
use crate::utils::constants::{
    FINISH_MESSAGE, REFRESH_MESSAGE, SHARE_CONTACT_MESSAGE, SHARE_LOCATION_MESSAGE, START_MESSAGE,
};

use lazy_static::lazy_static;
use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup};

lazy_static! {
    static ref ROLE_VARIANTS: Vec<String> = vec![
        Role::Requester.label().to_owned(),
        Role::Provider.label().to_owned()
    ];
}

pub fn make_role_keyboard() -> KeyboardMarkup {
    let mut markup = make_keyboard_from_string(&ROLE_VARIANTS);
    markup.one_time_keyboard = Option::from(true);
    markup
}

pub fn make_contact_keyboard() -> KeyboardMarkup {
    let mut contact_button = KeyboardButton::new(SHARE_CONTACT_MESSAGE);
    contact_button.request = Some(ButtonRequest::Contact);
    let mut markup = KeyboardMarkup::new(vec![vec![contact_button]]);
    markup.resize_keyboard = Option::from(true);
    markup.one_time_keyboard = Option::from(true);
    markup
}

pub fn make_main_menu_keyboard() -> KeyboardMarkup {
    let mut location_button = KeyboardButton::new(SHARE_LOCATION_MESSAGE);
    location_button.request = Some(ButtonRequest::Location);
    let keyboard = vec![
        vec![location_button],
        vec![
            KeyboardButton::new(REFRESH_MESSAGE),
            KeyboardButton::new(FINISH_MESSAGE),
        ],
        vec![KeyboardButton::new(START_MESSAGE)],
    ];
    let mut markup = KeyboardMarkup::new(keyboard);
    markup.resize_keyboard = Option::from(true);
    markup
}

fn make_keyboard_from_string(variants: &[String]) -> KeyboardMarkup {
    let mut keyboard: Vec<Vec<KeyboardButton>> = vec![];

    for versions in variants.chunks(3) {
        let row = versions.iter().map(KeyboardButton::new).collect();
        keyboard.push(row);
    }

    let mut markup = KeyboardMarkup::new(keyboard);
    markup.resize_keyboard = Option::from(true);
    markup
}
