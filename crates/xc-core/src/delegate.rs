//! Type-erased single-dispatch callable.
//!
//! A [`Delegate`] stores an opaque instance pointer, an opaque target pointer
//! and one proxy function that knows how to turn the two back into a call.
//! Binding a free function, a method on a receiver, or a closure only swaps
//! those three fields, so rebinding is free and the last bind wins.
//!
//! Arguments are passed as a single value; use a tuple for several.
//!
//! # Examples
//!
//! ```
//! use xc_core::Delegate;
//!
//! struct Counter {
//!     total: i32,
//! }
//!
//! impl Counter {
//!     fn add(&mut self, amount: i32) -> i32 {
//!         self.total += amount;
//!         self.total
//!     }
//! }
//!
//! fn double(x: i32) -> i32 {
//!     x * 2
//! }
//!
//! let mut counter = Counter { total: 0 };
//! let mut delegate = Delegate::new();
//! delegate.bind_fn(double);
//! assert_eq!(delegate.invoke(21), 42);
//!
//! delegate.bind_method(&mut counter, Counter::add);
//! delegate.invoke(5);
//! assert_eq!(delegate.invoke(5), 10);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr;

type Proxy<Args, R> = unsafe fn(*const (), *const (), Args) -> R;

/// A bound callable taking `Args` and returning `R`.
///
/// The lifetime `'a` covers whatever receiver or closure is bound, so the
/// delegate can never outlive it.
pub struct Delegate<'a, Args, R = ()> {
    instance: *const (),
    target: *const (),
    proxy: Option<Proxy<Args, R>>,
    _bound: PhantomData<&'a mut ()>,
}

unsafe fn function_proxy<Args, R>(_instance: *const (), target: *const (), args: Args) -> R {
    // SAFETY: `target` was produced from a `fn(Args) -> R` in `bind_fn`.
    let function = unsafe { mem::transmute::<*const (), fn(Args) -> R>(target) };
    function(args)
}

unsafe fn method_proxy<C, Args, R>(instance: *const (), target: *const (), args: Args) -> R {
    // SAFETY: `target` was produced from a `fn(&mut C, Args) -> R` and
    // `instance` from a `&'a mut C` in `bind_method`; the delegate holds that
    // exclusive borrow and `invoke` takes `&mut self`.
    unsafe {
        let method = mem::transmute::<*const (), fn(&mut C, Args) -> R>(target);
        method(&mut *instance.cast::<C>().cast_mut(), args)
    }
}

unsafe fn const_method_proxy<C, Args, R>(instance: *const (), target: *const (), args: Args) -> R {
    // SAFETY: `target` was produced from a `fn(&C, Args) -> R` and `instance`
    // from a `&'a C` in `bind_const_method`.
    unsafe {
        let method = mem::transmute::<*const (), fn(&C, Args) -> R>(target);
        method(&*instance.cast::<C>(), args)
    }
}

unsafe fn closure_proxy<F, Args, R>(instance: *const (), _target: *const (), args: Args) -> R
where
    F: Fn(Args) -> R,
{
    // SAFETY: `instance` was produced from a `&'a F` in `bind_closure`.
    let closure = unsafe { &*instance.cast::<F>() };
    closure(args)
}

impl<'a, Args, R> Delegate<'a, Args, R> {
    /// Creates an unbound delegate.
    #[must_use]
    pub const fn new() -> Self {
        Delegate {
            instance: ptr::null(),
            target: ptr::null(),
            proxy: None,
            _bound: PhantomData,
        }
    }

    /// Binds a free function. The instance pointer is cleared.
    pub fn bind_fn(&mut self, function: fn(Args) -> R) {
        self.instance = ptr::null();
        self.target = function as *const ();
        self.proxy = Some(function_proxy::<Args, R>);
    }

    /// Binds a method that needs exclusive access to its receiver.
    pub fn bind_method<C>(&mut self, instance: &'a mut C, method: fn(&mut C, Args) -> R) {
        self.instance = ptr::from_mut(instance).cast_const().cast::<()>();
        self.target = method as *const ();
        self.proxy = Some(method_proxy::<C, Args, R>);
    }

    /// Binds a method that only reads its receiver.
    pub fn bind_const_method<C>(&mut self, instance: &'a C, method: fn(&C, Args) -> R) {
        self.instance = ptr::from_ref(instance).cast::<()>();
        self.target = method as *const ();
        self.proxy = Some(const_method_proxy::<C, Args, R>);
    }

    /// Binds a borrowed closure.
    pub fn bind_closure<F>(&mut self, closure: &'a F)
    where
        F: Fn(Args) -> R,
    {
        self.instance = ptr::from_ref(closure).cast::<()>();
        self.target = ptr::null();
        self.proxy = Some(closure_proxy::<F, Args, R>);
    }

    /// Returns the delegate to the unbound state.
    pub fn unbind(&mut self) {
        *self = Self::new();
    }

    /// Returns true if a target is bound.
    #[inline]
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.proxy.is_some()
    }

    /// Calls the bound target.
    ///
    /// # Panics
    ///
    /// Panics if nothing is bound.
    #[inline]
    pub fn invoke(&mut self, args: Args) -> R {
        match self.try_invoke(args) {
            Some(result) => result,
            None => panic!("invoked an unbound delegate"),
        }
    }

    /// Calls the bound target, or returns `None` if nothing is bound.
    #[inline]
    pub fn try_invoke(&mut self, args: Args) -> Option<R> {
        let proxy = self.proxy?;
        // SAFETY: `proxy`, `instance` and `target` were set together by one
        // of the `bind_*` methods, and `'a` keeps the receiver alive.
        Some(unsafe { proxy(self.instance, self.target, args) })
    }
}

impl<Args, R> Default for Delegate<'_, Args, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, R> fmt::Debug for Delegate<'_, Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("bound", &self.is_bound())
            .field("instance", &self.instance)
            .finish()
    }
}
