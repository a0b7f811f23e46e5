//! # Order Sample Domain
//!
//! A small order-management model wired the way an ORM would hydrate it:
//! back references from items to their order and from addresses to their
//! customer, one product shared by two items, and departments shared
//! between categories.
//!
//! Back references are `Weak` so the sample graph is freed normally.

use chrono::{NaiveDate, NaiveDateTime};
use replica_core::{
    FieldType, FieldValue, Introspect, ObjectRef, TypeDescriptor, TypeRegistry,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// =============================================================================
// MODEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Business,
    Residential,
}

impl AddressType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Residential => "Residential",
        }
    }
}

pub struct Customer {
    pub key: i64,
    pub timestamp: String,
    pub first_name: String,
    pub last_name: String,
    pub addresses: RefCell<Vec<Rc<Address>>>,
}

pub struct Address {
    pub key: i64,
    pub timestamp: String,
    pub customer: RefCell<Weak<Customer>>,
    pub street: String,
    pub city: String,
    pub address_type: AddressType,
    pub zip_code: i32,
}

pub struct Department {
    pub key: i64,
    pub timestamp: String,
    pub name: String,
    pub description: Option<String>,
}

pub struct Category {
    pub key: i64,
    pub timestamp: String,
    pub name: String,
    pub sort_order: i16,
    pub departments: Vec<Rc<Department>>,
}

pub struct Product {
    pub key: i64,
    pub timestamp: String,
    pub name: String,
    pub category: Option<Rc<Category>>,
}

pub struct Item {
    pub key: i64,
    pub timestamp: String,
    pub order: RefCell<Weak<Order>>,
    pub quantity: i32,
    pub price: f32,
    pub product: Option<Rc<Product>>,
}

pub struct Order {
    pub key: i64,
    pub timestamp: String,
    pub name: String,
    pub customer: Option<Rc<Customer>>,
    pub address: Option<Rc<Address>>,
    pub items: Vec<Rc<Item>>,
    pub sent_date: Option<NaiveDateTime>,
    pub alerts: Vec<i64>,
    pub contact_times: Vec<NaiveDateTime>,
    pub coupons: Vec<String>,
    pub hold: bool,
}

// =============================================================================
// INTROSPECTION
// =============================================================================

impl Introspect for Customer {
    fn type_name(&self) -> &str {
        "Customer"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "FirstName" => self.first_name.as_str().into(),
            "LastName" => self.last_name.as_str().into(),
            "Addresses" => FieldValue::objects(&self.addresses.borrow()),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Address {
    fn type_name(&self) -> &str {
        "Address"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Customer" => FieldValue::optional_object(self.customer.borrow().upgrade()),
            "Street" => self.street.as_str().into(),
            "City" => self.city.as_str().into(),
            "AddressType" => FieldValue::member(self.address_type.as_str()),
            "ZipCode" => self.zip_code.into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Department {
    fn type_name(&self) -> &str {
        "Department"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Name" => self.name.as_str().into(),
            "Description" => self.description.clone().into(),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Category {
    fn type_name(&self) -> &str {
        "Category"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Name" => self.name.as_str().into(),
            "SortOrder" => self.sort_order.into(),
            "Departments" => FieldValue::objects(&self.departments),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Product {
    fn type_name(&self) -> &str {
        "Product"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Name" => self.name.as_str().into(),
            "Category" => FieldValue::optional_object(self.category.clone()),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Item {
    fn type_name(&self) -> &str {
        "Item"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Order" => FieldValue::optional_object(self.order.borrow().upgrade()),
            "Quantity" => self.quantity.into(),
            "Price" => self.price.into(),
            "Product" => FieldValue::optional_object(self.product.clone()),
            _ => return None,
        };
        Some(value)
    }
}

impl Introspect for Order {
    fn type_name(&self) -> &str {
        "Order"
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value: FieldValue = match name {
            "Key" => self.key.into(),
            "Timestamp" => self.timestamp.as_str().into(),
            "Name" => self.name.as_str().into(),
            "Customer" => FieldValue::optional_object(self.customer.clone()),
            "Address" => FieldValue::optional_object(self.address.clone()),
            "Items" => FieldValue::objects(&self.items),
            "SentDate" => self.sent_date.into(),
            "Alerts" => FieldValue::sequence(self.alerts.iter().copied()),
            "ContactTimes" => FieldValue::sequence(self.contact_times.iter().copied()),
            "Coupons" => FieldValue::sequence(self.coupons.iter().map(String::as_str)),
            "Hold" => self.hold.into(),
            _ => return None,
        };
        Some(value)
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

fn persistent(name: &str) -> TypeDescriptor {
    TypeDescriptor::new(name)
        .field("Key", FieldType::Int64)
        .field("Timestamp", FieldType::String)
}

/// Descriptor table for the order model.
pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with_type(
            persistent("Order")
                .field("Name", FieldType::String)
                .field("Customer", FieldType::entity("Customer"))
                .field("Address", FieldType::entity("Address"))
                .field("Items", FieldType::list(FieldType::entity("Item")))
                .field("SentDate", FieldType::nullable(FieldType::DateTime))
                .field("Alerts", FieldType::array(FieldType::Int64))
                .field("ContactTimes", FieldType::array(FieldType::DateTime))
                .field("Coupons", FieldType::list(FieldType::String))
                .field("Hold", FieldType::Boolean),
        )
        .with_type(
            persistent("Customer")
                .field("FirstName", FieldType::String)
                .field("LastName", FieldType::String)
                .field("Addresses", FieldType::list(FieldType::entity("Address"))),
        )
        .with_type(
            persistent("Address")
                .field("Customer", FieldType::entity("Customer"))
                .field("Street", FieldType::String)
                .field("City", FieldType::String)
                .field("AddressType", FieldType::enumeration("AddressType"))
                .field("ZipCode", FieldType::Int32),
        )
        .with_type(
            persistent("Department")
                .field("Name", FieldType::String)
                .field("Description", FieldType::String),
        )
        .with_type(
            persistent("Category")
                .field("Name", FieldType::String)
                .field("SortOrder", FieldType::Int16)
                .field("Departments", FieldType::array(FieldType::entity("Department"))),
        )
        .with_type(
            persistent("Product")
                .field("Name", FieldType::String)
                .field("Category", FieldType::entity("Category")),
        )
        .with_type(
            persistent("Item")
                .field("Order", FieldType::entity("Order"))
                .field("Quantity", FieldType::Int32)
                .field("Price", FieldType::Single)
                .field("Product", FieldType::entity("Product")),
        )
}

// =============================================================================
// GRAPH
// =============================================================================

fn timestamp(y: i32, m: u32, d: u32, h: u32, mi: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(h, mi, 0))
}

fn department(key: i64, stamp: &str, name: &str, description: Option<&str>) -> Rc<Department> {
    Rc::new(Department {
        key,
        timestamp: stamp.to_string(),
        name: name.to_string(),
        description: description.map(String::from),
    })
}

fn address(
    key: i64,
    stamp: &str,
    street: &str,
    city: &str,
    address_type: AddressType,
    zip_code: i32,
) -> Rc<Address> {
    Rc::new(Address {
        key,
        timestamp: stamp.to_string(),
        customer: RefCell::new(Weak::new()),
        street: street.to_string(),
        city: city.to_string(),
        address_type,
        zip_code,
    })
}

fn item(key: i64, stamp: &str, quantity: i32, price: f32, product: &Rc<Product>) -> Rc<Item> {
    Rc::new(Item {
        key,
        timestamp: stamp.to_string(),
        order: RefCell::new(Weak::new()),
        quantity,
        price,
        product: Some(product.clone()),
    })
}

/// Build the order sample graph.
pub fn order() -> Rc<Order> {
    let customer = Rc::new(Customer {
        key: 1,
        timestamp: "3".to_string(),
        first_name: "Mortimer".to_string(),
        last_name: "Sneurd".to_string(),
        addresses: RefCell::new(Vec::new()),
    });

    let home = address(
        0,
        "1",
        "1313 Mockingbird Lane",
        "Candy Land",
        AddressType::Residential,
        90210,
    );
    let business = address(
        1,
        "2",
        "411 Bonham",
        "Sao Antonio",
        AddressType::Business,
        66016,
    );
    for a in [&home, &business] {
        *a.customer.borrow_mut() = Rc::downgrade(&customer);
    }
    *customer.addresses.borrow_mut() = vec![home, business.clone()];

    let electronics = department(0, "4", "Electronics", Some("Batteries, cables and chargers"));
    let computers = department(1, "5", "Computers", None);
    let music = department(2, "6", "Music", Some("Instruments and sheet music"));

    let batteries = Rc::new(Category {
        key: 0,
        timestamp: "7".to_string(),
        name: "Batteries".to_string(),
        sort_order: 1,
        departments: vec![electronics, computers.clone()],
    });
    let sheet_music = Rc::new(Category {
        key: 2,
        timestamp: "8".to_string(),
        name: "Sheet Music".to_string(),
        sort_order: 2,
        departments: vec![computers, music],
    });

    let everready = Rc::new(Product {
        key: 0,
        timestamp: "9".to_string(),
        name: "Everready".to_string(),
        category: Some(batteries),
    });
    let theme = Rc::new(Product {
        key: 1,
        timestamp: "10".to_string(),
        name: "Shroeder's Theme".to_string(),
        category: Some(sheet_music),
    });

    let items = vec![
        item(0, "11", 6, 13.13, &everready),
        item(1, "12", 1, 15.0, &theme),
        item(2, "13", 1, 5.0, &everready),
    ];

    let order = Rc::new(Order {
        key: 1,
        timestamp: "14".to_string(),
        name: "Business Order #1".to_string(),
        customer: Some(customer),
        address: Some(business),
        items,
        sent_date: None,
        alerts: vec![1234, 5678],
        contact_times: [timestamp(2013, 12, 25, 9, 30), timestamp(2014, 1, 1, 10, 0)]
            .into_iter()
            .flatten()
            .collect(),
        coupons: vec!["Summer".to_string(), "Fall".to_string()],
        hold: true,
    });

    for i in &order.items {
        *i.order.borrow_mut() = Rc::downgrade(&order);
    }

    order
}

/// The order sample as a walk root.
pub fn root() -> ObjectRef {
    order()
}

// =============================================================================
// TESTS
// =============================================================================
