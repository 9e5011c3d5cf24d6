/*!
# Functions

Functions take one argument without parentheses. `SIN X*2` is
`(SIN X)*2`. Write `SIN(X*2)` to take the sine of the product.
*/

pub mod ABS {
    /*!
    ## `ABS X` Absolute value.
    */
}

pub mod SIN {
    /*!
    ## `SIN X` `COS X` `TAN X` Trigonometry in radians.
    ## `ASN X` `ACS X` `ATN X` Their inverses.
    ```text
    PRINT SIN(PI/2)
    1
    ```
    */
}

pub mod EXP {
    /*!
    ## `EXP X` `LN X` `SQR X` Powers of e, natural logarithm, square root.
    */
}

pub mod INT {
    /*!
    ## `INT X` Drops the fraction, toward zero.
    ```text
    PRINT INT -2.7
    -2
    ```
    */
}

pub mod SGN {
    /*!
    ## `SGN X` -1, 0 or 1 by the sign of X.
    */
}

pub mod NOT {
    /*!
    ## `NOT X` 1 when X is zero, otherwise 0.
    */
}

pub mod BIN {
    /*!
    ## `BIN X` Reads the digits of X as a binary number.
    ```text
    PRINT BIN 1011
    11
    ```
    Any digit other than 0 or 1 is an `ILLEGAL FUNCTION CALL`.
    */
}

pub mod PI {
    /*!
    ## `PI` 3.14159
    ## `RND` A random number from 0 up to but not including 1.
    */
}

pub mod CODE {
    /*!
    ## `CODE X$` Character code of the first character, 0 when empty.
    ## `LEN X$` Number of characters.
    ## `VAL X$` The number written in X$, 0 when it is not a number.
    */
}

pub mod CHR {
    /*!
    ## `CHR$ X` The character with code X, 0 to 255.
    ## `STR$ X` X written as `PRINT` would write it.
    ```text
    PRINT CHR$ 65 + STR$ 1.5
    A1.5
    ```
    */
}
