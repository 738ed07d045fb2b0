//! Interface to implementation conversion.
//!
//! Rust has no stable way to unsize an `Rc<T>` into an `Rc<dyn Trait>`
//! generically, so every (interface, implementation) pair states the
//! conversion once through [`Upcast`]. The [`implements!`](crate::implements)
//! macro writes these impls.

use std::rc::Rc;

/// Conversion of a shared implementation handle into its interface.
///
/// Every type upcasts to itself, which is what binding a type to itself uses.
///
/// # Examples
///
/// ```rust
/// use ferrous_resolver::{implements, Upcast};
/// use std::rc::Rc;
///
/// trait Greeter {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// implements!(English => dyn Greeter);
///
/// let greeter: Rc<dyn Greeter> = <English as Upcast<dyn Greeter>>::upcast(Rc::new(English));
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Upcast<I: ?Sized>: 'static {
    /// Converts the handle, keeping the same allocation.
    fn upcast(this: Rc<Self>) -> Rc<I>;
}

impl<T: 'static> Upcast<T> for T {
    #[inline(always)]
    fn upcast(this: Rc<Self>) -> Rc<T> {
        this
    }
}

/// Declares that an implementation type can be bound to one or more interfaces.
///
/// ```rust
/// use ferrous_resolver::implements;
///
/// trait Reader {}
/// trait Writer {}
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($interface:ty),+ $(,)?) => {
        $(
            impl $crate::Upcast<$interface> for $implementation {
                #[inline(always)]
                fn upcast(this: ::std::rc::Rc<Self>) -> ::std::rc::Rc<$interface> {
                    this
                }
            }
        )+
    };
}
